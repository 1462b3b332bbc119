use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    MissingField(&'static str),

    #[error("{0}")]
    InvalidFormat(&'static str),

    #[error("Cette date a atteint le nombre maximum de rendez-vous (2 par jour).")]
    CapacityExceeded,

    #[error("La nouvelle date a atteint le nombre maximum de rendez-vous (2 par jour).")]
    NewDateCapacityExceeded,

    #[error("Ce créneau est déjà réservé.")]
    SlotTaken,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Aucun champ à mettre à jour")]
    NoFieldsProvided,

    #[error("Identifiant, date ou nom requis")]
    MissingCriteria,

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Compte non approuvé")]
    AccountNotApproved,

    #[error("token error: {0}")]
    Token(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingField(_)
            | AppError::InvalidFormat(_)
            | AppError::NoFieldsProvided
            | AppError::MissingCriteria => StatusCode::BAD_REQUEST,
            AppError::CapacityExceeded
            | AppError::NewDateCapacityExceeded
            | AppError::SlotTaken
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::AccountNotApproved => StatusCode::FORBIDDEN,
        };

        // Internal failures are logged with full detail but never echoed back.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
            "Erreur interne du serveur".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl AppError {
    /// Maps a UNIQUE(date, time) violation raised by the slot index to the
    /// domain conflict; everything else stays a database error.
    pub fn from_insert(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, _) = &err {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                return AppError::SlotTaken;
            }
        }
        AppError::Database(err)
    }
}
