use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Appointment;
use crate::services::booking::{self, BookingRequest, UpdateRequest, DAILY_CAPACITY};
use crate::services::verification::{self, VerifyRequest};
use crate::state::AppState;

// POST /api/rendezvous
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = {
        let mut db = state.db.lock().unwrap();
        booking::create_appointment(&mut db, &req)?
    };

    tracing::info!(id = created.id, "appointment created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Rendez-vous créé avec succès",
            "id": created.id,
            "token_image": created.token_image,
        })),
    ))
}

// POST /api/rendezvous/verify
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = {
        let db = state.db.lock().unwrap();
        verification::verify_appointment(&db, &req)?
    };

    let appointment = &outcome.appointment;
    let message = if outcome.already_verified {
        "Déjà vérifié"
    } else {
        "Rendez-vous vérifié"
    };

    Ok(Json(serde_json::json!({
        "message": message,
        "already_verified": outcome.already_verified,
        "id": appointment.id,
        "full_name": appointment.full_name,
        "subject": appointment.subject,
        "date": appointment.date,
        "time": appointment.time,
        "status": appointment.status,
        "token_image": appointment.token_image,
    })))
}

// GET /api/rendezvous?page&limit
#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn positive_or(raw: &Option<String>, default: i64) -> i64 {
    raw.as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = positive_or(&query.page, 1);
    let limit = positive_or(&query.limit, 10);
    let offset = (page - 1) * limit;

    let (total, items): (i64, Vec<Appointment>) = {
        let db = state.db.lock().unwrap();
        (
            queries::count_appointments(&db)?,
            queries::list_appointments(&db, limit, offset)?,
        )
    };

    let total_pages = (total + limit - 1) / limit;

    Ok(Json(serde_json::json!({
        "data": items,
        "pagination": {
            "current_page": page,
            "total_pages": total_pages,
            "total_items": total,
            "items_per_page": limit,
        },
    })))
}

// GET /api/rendezvous/:id
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = {
        let db = state.db.lock().unwrap();
        queries::get_appointment(&db, id)?
    };

    appointment
        .map(Json)
        .ok_or(AppError::NotFound("Rendez-vous non trouvé"))
}

// PUT /api/rendezvous/:id
pub async fn update_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let db = state.db.lock().unwrap();
        booking::update_appointment(&db, id, &req)?;
    }

    Ok(Json(serde_json::json!({
        "message": "Rendez-vous mis à jour avec succès"
    })))
}

// DELETE /api/rendezvous/:id
pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let affected = {
        let db = state.db.lock().unwrap();
        queries::delete_appointment(&db, id)?
    };

    if affected == 0 {
        return Err(AppError::NotFound("Rendez-vous non trouvé"));
    }

    Ok(Json(serde_json::json!({
        "message": "Rendez-vous supprimé avec succès"
    })))
}

// GET /api/rendezvous/booked-slots/:date
pub async fn booked_slots(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let times = {
        let db = state.db.lock().unwrap();
        queries::booked_slots(&db, &date)?
    };
    Ok(Json(times))
}

// GET /api/rendezvous/booked-dates
#[derive(Serialize)]
pub struct BookedDateResponse {
    date: String,
    times: Vec<String>,
    full: bool,
}

pub async fn booked_dates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookedDateResponse>>, AppError> {
    let dates = {
        let db = state.db.lock().unwrap();
        queries::booked_dates(&db, DAILY_CAPACITY)?
    };

    let response = dates
        .into_iter()
        .map(|row| BookedDateResponse {
            date: row.date,
            times: row.times.split(',').map(str::to_string).collect(),
            full: row.count >= DAILY_CAPACITY,
        })
        .collect();

    Ok(Json(response))
}

// GET /api/rendezvous/available-dates
#[derive(Serialize)]
pub struct AvailableDateResponse {
    date: String,
    remaining_slots: i64,
}

pub async fn available_dates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AvailableDateResponse>>, AppError> {
    let dates = {
        let db = state.db.lock().unwrap();
        queries::available_dates(&db, DAILY_CAPACITY)?
    };

    let response = dates
        .into_iter()
        .map(|row| AvailableDateResponse {
            date: row.date,
            remaining_slots: DAILY_CAPACITY - row.count,
        })
        .collect();

    Ok(Json(response))
}
