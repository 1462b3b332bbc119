use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus};
use crate::services::token_image::{self, TokenColor};
use crate::services::validation;

#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    pub id: Option<String>,
    pub date: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug)]
pub struct VerifyOutcome {
    pub appointment: Appointment,
    pub already_verified: bool,
}

/// Check-in: finds the appointment by id, date and/or name, flips it to
/// verified and regenerates the token. Verifying twice is a no-op that
/// reports `already_verified` without touching the stored token.
pub fn verify_appointment(conn: &Connection, req: &VerifyRequest) -> Result<VerifyOutcome, AppError> {
    let mut id = req.id.as_deref().filter(|s| !s.is_empty());
    let mut date = req.date.as_deref().filter(|s| !s.is_empty());
    let name = req.full_name.as_deref().filter(|s| !s.is_empty());

    // Legacy scanners send the scanned date in the id field; a date-shaped
    // id is a date criterion.
    if let Some(candidate) = id {
        if validation::is_valid_date(candidate) {
            date = Some(candidate);
            id = None;
        }
    }

    if id.is_none() && date.is_none() && name.is_none() {
        return Err(AppError::MissingCriteria);
    }

    // A non-numeric id can never match a row.
    let numeric_id = match id {
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => return Err(AppError::NotFound("Aucun rendez-vous trouvé")),
        },
        None => None,
    };

    let appointment = queries::find_for_verification(conn, numeric_id, date, name)?
        .ok_or(AppError::NotFound("Aucun rendez-vous trouvé"))?;

    if appointment.status == AppointmentStatus::Verified {
        return Ok(VerifyOutcome {
            appointment,
            already_verified: true,
        });
    }

    let payload = serde_json::json!({
        "id": appointment.id,
        "full_name": appointment.full_name,
        "date": appointment.date,
        "time": appointment.time,
        "subject": appointment.subject,
        "status": "VERIFIED",
        "verified_at": Utc::now().to_rfc3339(),
    });
    let token = token_image::generate(&payload, TokenColor::Verified)?;

    queries::mark_verified(conn, appointment.id, &token)?;
    tracing::info!(id = appointment.id, "appointment verified");

    Ok(VerifyOutcome {
        appointment: Appointment {
            status: AppointmentStatus::Verified,
            token_image: token,
            ..appointment
        },
        already_verified: false,
    })
}
