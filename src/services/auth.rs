use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::errors::AppError;

const TOKEN_TTL_SECS: i64 = 3600;

const B64: base64::engine::general_purpose::GeneralPurpose =
    base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Identity claims carried by a bearer token. `role` is "user", "admin" or
/// "dg"; `sub` is the row id in the matching credential table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: i64, name: &str, role: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub,
            name: name.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Token(format!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

pub fn password_matches(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Token(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn sign(payload: &str, secret: &str) -> Result<String, AppError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Token(format!("invalid signing secret: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(B64.encode(mac.finalize().into_bytes()))
}

/// `base64url(claims).base64url(hmac-sha1(claims))`.
pub fn mint_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    let payload = serde_json::to_string(claims)
        .map_err(|e| AppError::Token(format!("failed to serialize claims: {e}")))?;
    let encoded = B64.encode(&payload);
    let signature = sign(&encoded, secret)?;
    Ok(format!("{encoded}.{signature}"))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let (encoded, signature) = token
        .split_once('.')
        .ok_or(AppError::Unauthorized("Invalid token"))?;

    let expected = sign(encoded, secret)?;
    if expected != signature {
        return Err(AppError::Unauthorized("Invalid token"));
    }

    let payload = B64
        .decode(encoded)
        .map_err(|_| AppError::Unauthorized("Invalid token"))?;
    let claims: Claims =
        serde_json::from_slice(&payload).map_err(|_| AppError::Unauthorized("Invalid token"))?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(AppError::Unauthorized("Invalid token"));
    }

    Ok(claims)
}

/// Pulls the claims out of an `Authorization: Bearer …` header value.
pub fn claims_from_bearer(header: Option<&str>, secret: &str) -> Result<Claims, AppError> {
    let header = header.ok_or(AppError::Unauthorized("No token provided"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized("No token provided"))?;
    verify_token(token, secret)
}
