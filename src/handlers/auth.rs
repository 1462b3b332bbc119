use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::auth::{self, Claims};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// POST /api/auth/register — accounts start deactivated until approved.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(username), Some(email), Some(password)) = (
        req.username.filter(|s| !s.is_empty()),
        req.email.filter(|s| !s.is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::MissingField(
            "Nom d'utilisateur, email et mot de passe requis",
        ));
    };

    let password_hash = auth::hash_password(&password)?;

    let user_id = {
        let db = state.db.lock().unwrap();
        queries::insert_user(&db, &username, &email, &password_hash).map_err(|e| {
            if let rusqlite::Error::SqliteFailure(code, _) = &e {
                if code.code == rusqlite::ErrorCode::ConstraintViolation {
                    return AppError::Conflict("Ce nom d'utilisateur est déjà utilisé");
                }
            }
            AppError::Database(e)
        })?
    };

    tracing::info!(user_id, "user registered, awaiting approval");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Utilisateur inscrit avec succès, en attente de l'approbation de l'administrateur.",
            "user_id": user_id,
        })),
    ))
}

// PUT /api/auth/approve/:id
pub async fn approve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let affected = {
        let db = state.db.lock().unwrap();
        queries::activate_user(&db, id)?
    };

    if affected == 0 {
        return Err(AppError::NotFound("Utilisateur non trouvé"));
    }

    Ok(Json(serde_json::json!({
        "message": "Utilisateur approuvé avec succès."
    })))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(username), Some(password)) = (
        req.username.filter(|s| !s.is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::MissingField(
            "Nom d'utilisateur et mot de passe requis",
        ));
    };

    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_username(&db, &username)?
    }
    .ok_or(AppError::NotFound("Utilisateur non trouvé"))?;

    if !user.is_active {
        return Err(AppError::AccountNotApproved);
    }
    if !auth::password_matches(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Mot de passe invalide"));
    }

    let role = if user.is_admin { "admin" } else { "user" };
    let token = auth::mint_token(&Claims::new(user.id, &user.username, role), &state.config.token_secret)?;

    Ok(Json(serde_json::json!({
        "message": "Connexion réussie",
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
            "is_admin": user.is_admin,
        },
    })))
}

// GET /api/auth/users
pub async fn users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<serde_json::Value>>, AppError> {
    let users = {
        let db = state.db.lock().unwrap();
        queries::list_users(&db)?
    };

    let response = users
        .into_iter()
        .map(|u| {
            serde_json::json!({
                "id": u.id,
                "username": u.username,
                "email": u.email,
                "is_active": u.is_active,
                "created_at": u.created_at,
            })
        })
        .collect();

    Ok(Json(response))
}

// GET /api/auth/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let header = headers.get("authorization").and_then(|v| v.to_str().ok());
    let claims = auth::claims_from_bearer(header, &state.config.token_secret)?;

    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_id(&db, claims.sub)?
    }
    .ok_or(AppError::NotFound("Utilisateur non trouvé"))?;

    Ok(Json(serde_json::json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "created_at": user.created_at,
    })))
}
