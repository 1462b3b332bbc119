use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rendezvous::config::AppConfig;
use rendezvous::db;
use rendezvous::handlers;
use rendezvous::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        !config.token_secret.is_empty(),
        "TOKEN_SECRET must be set (no built-in default)"
    );

    let conn = db::init_db(&config.database_url)?;

    let cors = match config.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>().context("invalid CORS_ORIGIN")?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/rendezvous", post(handlers::rendezvous::create))
        .route("/api/rendezvous", get(handlers::rendezvous::list))
        .route("/api/rendezvous/verify", post(handlers::rendezvous::verify))
        .route(
            "/api/rendezvous/booked-slots/:date",
            get(handlers::rendezvous::booked_slots),
        )
        .route(
            "/api/rendezvous/booked-dates",
            get(handlers::rendezvous::booked_dates),
        )
        .route(
            "/api/rendezvous/available-dates",
            get(handlers::rendezvous::available_dates),
        )
        .route("/api/rendezvous/:id", get(handlers::rendezvous::get_one))
        .route("/api/rendezvous/:id", put(handlers::rendezvous::update_one))
        .route(
            "/api/rendezvous/:id",
            delete(handlers::rendezvous::delete_one),
        )
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/approve/:id", put(handlers::auth::approve))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/users", get(handlers::auth::users))
        .route("/api/auth/profile", get(handlers::auth::profile))
        .route("/api/auth/dg/register", post(handlers::auth_dg::register))
        .route("/api/auth/dg/login", post(handlers::auth_dg::login))
        .route(
            "/api/director/appointments",
            get(handlers::director::appointments),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
