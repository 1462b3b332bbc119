use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub token_secret: String,
    pub cors_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "rendezvous.db".to_string()),
            // No compiled-in fallback: main refuses to start when this is empty.
            token_secret: env::var("TOKEN_SECRET").unwrap_or_default(),
            cors_origin: env::var("CORS_ORIGIN").ok(),
        }
    }
}
