use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::auth::{self, Claims};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DgRegisterRequest {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

// POST /api/auth/dg/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DgRegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(last_name), Some(first_name), Some(email), Some(password)) = (
        req.last_name.filter(|s| !s.is_empty()),
        req.first_name.filter(|s| !s.is_empty()),
        req.email.filter(|s| !s.is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::MissingField(
            "Nom, prénom, email et mot de passe requis",
        ));
    };

    let dg_id = {
        let db = state.db.lock().unwrap();

        if queries::director_email_exists(&db, &email)? {
            return Err(AppError::Conflict("Cet email est déjà utilisé"));
        }

        let password_hash = auth::hash_password(&password)?;
        queries::insert_director(
            &db,
            &queries::NewDirector {
                last_name: &last_name,
                first_name: &first_name,
                email: &email,
                password_hash: &password_hash,
                phone: req.phone.as_deref().filter(|s| !s.is_empty()),
            },
        )?
    };

    tracing::info!(dg_id, "director-general account created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Compte Directeur Général créé avec succès",
            "dg_id": dg_id,
            "last_name": last_name,
            "first_name": first_name,
            "email": email,
        })),
    ))
}

#[derive(Deserialize)]
pub struct DgLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// POST /api/auth/dg/login — only 'actif' accounts may log in.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DgLoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(email), Some(password)) = (
        req.email.filter(|s| !s.is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::MissingField("Email et mot de passe requis"));
    };

    let dg = {
        let db = state.db.lock().unwrap();
        queries::get_active_director_by_email(&db, &email)?
    }
    .ok_or(AppError::Unauthorized("Email ou mot de passe incorrect"))?;

    if !auth::password_matches(&password, &dg.password_hash)? {
        return Err(AppError::Unauthorized("Email ou mot de passe incorrect"));
    }

    let token = auth::mint_token(&Claims::new(dg.id, &dg.email, "dg"), &state.config.token_secret)?;

    Ok(Json(serde_json::json!({
        "message": "Connexion réussie",
        "token": token,
        "dg": {
            "id": dg.id,
            "last_name": dg.last_name,
            "first_name": dg.first_name,
            "email": dg.email,
            "phone": dg.phone,
            "status": dg.status,
            "created_at": dg.created_at,
        },
    })))
}
