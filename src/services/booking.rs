use rusqlite::types::ToSql;
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::AppointmentStatus;
use crate::services::token_image::{self, TokenColor};
use crate::services::validation;

/// Hard cap on appointments sharing one calendar date.
pub const DAILY_CAPACITY: i64 = 2;

#[derive(Debug, Default, Deserialize)]
pub struct BookingRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub time: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub time: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct CreatedAppointment {
    pub id: i64,
    pub token_image: String,
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Books a slot. Format validation runs before any query; the capacity
/// check, slot check and insert share one transaction so two concurrent
/// requests cannot both pass the preconditions.
pub fn create_appointment(
    conn: &mut Connection,
    req: &BookingRequest,
) -> Result<CreatedAppointment, AppError> {
    let (Some(full_name), Some(phone), Some(subject), Some(time), Some(date)) = (
        provided(&req.full_name),
        provided(&req.phone),
        provided(&req.subject),
        provided(&req.time),
        provided(&req.date),
    ) else {
        return Err(AppError::MissingField("Champs requis manquants"));
    };

    if !validation::is_valid_time(time) {
        return Err(AppError::InvalidFormat("Format d'heure invalide"));
    }
    if !validation::is_valid_date(date) {
        return Err(AppError::InvalidFormat("Format de date invalide"));
    }
    if !validation::is_valid_phone(phone) {
        return Err(AppError::InvalidFormat("Format de téléphone invalide"));
    }
    let email = provided(&req.email);
    if let Some(email) = email {
        if !validation::is_valid_email(email) {
            return Err(AppError::InvalidFormat("Format d'email invalide"));
        }
    }

    let tx = conn.transaction()?;

    if queries::count_for_date(&tx, date)? >= DAILY_CAPACITY {
        return Err(AppError::CapacityExceeded);
    }
    if queries::slot_exists(&tx, date, time)? {
        return Err(AppError::SlotTaken);
    }

    let payload = serde_json::json!({
        "full_name": full_name,
        "phone": phone,
        "date": date,
        "time": time,
        "subject": token_image::truncate_subject(subject),
    });
    let token_image = token_image::generate(&payload, TokenColor::Pending)?;

    let id = queries::insert_appointment(
        &tx,
        &queries::NewAppointment {
            full_name,
            phone,
            email,
            subject,
            date,
            time,
            token_image: &token_image,
        },
    )
    .map_err(AppError::from_insert)?;

    tx.commit()?;

    Ok(CreatedAppointment { id, token_image })
}

/// Partial update. The capacity invariant is re-checked only when the date
/// actually changes; a new time must pass format validation.
pub fn update_appointment(conn: &Connection, id: i64, req: &UpdateRequest) -> Result<(), AppError> {
    let existing = queries::get_appointment(conn, id)?
        .ok_or(AppError::NotFound("Rendez-vous non trouvé"))?;

    if let Some(date) = provided(&req.date) {
        if date != existing.date && queries::count_for_date(conn, date)? >= DAILY_CAPACITY {
            return Err(AppError::NewDateCapacityExceeded);
        }
    }

    if let Some(time) = provided(&req.time) {
        if !validation::is_valid_time(time) {
            return Err(AppError::InvalidFormat("Format d'heure invalide"));
        }
    }

    let mut fields: Vec<(&'static str, Box<dyn ToSql>)> = vec![];
    if let Some(full_name) = provided(&req.full_name) {
        fields.push(("full_name", Box::new(full_name.to_string())));
    }
    if let Some(phone) = provided(&req.phone) {
        fields.push(("phone", Box::new(phone.to_string())));
    }
    // email may be cleared by sending an empty string
    if let Some(email) = req.email.as_deref() {
        fields.push(("email", Box::new(email.to_string())));
    }
    if let Some(subject) = provided(&req.subject) {
        fields.push(("subject", Box::new(subject.to_string())));
    }
    if let Some(time) = provided(&req.time) {
        fields.push(("time", Box::new(time.to_string())));
    }
    if let Some(date) = provided(&req.date) {
        fields.push(("date", Box::new(date.to_string())));
    }
    if let Some(status) = provided(&req.status) {
        fields.push(("status", Box::new(AppointmentStatus::parse(status).as_str().to_string())));
    }

    if fields.is_empty() {
        return Err(AppError::NoFieldsProvided);
    }

    queries::update_appointment_fields(conn, id, &fields).map_err(AppError::from_insert)?;
    Ok(())
}
