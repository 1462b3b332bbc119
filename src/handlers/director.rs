use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DirectorAppointmentResponse {
    id: i64,
    visitor_name: String,
    subject: String,
    date: String,
    time: String,
    status: String,
}

// GET /api/director/appointments
pub async fn appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DirectorAppointmentResponse>>, AppError> {
    let rows = {
        let db = state.db.lock().unwrap();
        queries::director_appointments(&db)?
    };

    let response = rows
        .into_iter()
        .map(|row| DirectorAppointmentResponse {
            id: row.id,
            visitor_name: row.visitor_name,
            subject: row.subject,
            date: row.date,
            time: row.time,
            status: row.status,
        })
        .collect();

    Ok(Json(response))
}
