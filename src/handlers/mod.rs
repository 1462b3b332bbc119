pub mod auth;
pub mod auth_dg;
pub mod director;
pub mod health;
pub mod rendezvous;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Endpoint non trouvé" })),
    )
}
