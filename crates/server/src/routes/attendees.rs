use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use eventdesk_core::{Attendee, Value, ATTENDEES};
use eventdesk_store::FilterOp;
use tracing::info;

use super::delete_document;
use crate::error::AppError;
use crate::payload::{CountResponse, RegisterRequest, StatusResponse};
use crate::state::AppState;

/// `POST /api/attendees/register`
///
/// The email lookup and the insert are separate store calls, so two
/// concurrent registrations with one email can both be stored.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<Attendee>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let mut attendee = Attendee {
        id: String::new(),
        full_name: request.full_name,
        email: request.email,
        designation: request.designation,
        registered_at: Utc::now(),
    };
    let record = attendee.clone();

    let created = state
        .with_store("Failed to register", move |store| {
            let attendees = store.collection(ATTENDEES);
            let existing = attendees
                .filter(
                    Attendee::EMAIL_KEY,
                    FilterOp::Eq,
                    Value::from(record.email.as_str()),
                )
                .limit(1)
                .documents()
                .get_all()?;
            if !existing.is_empty() {
                return Ok(None);
            }
            let doc = attendees.add_record(&record)?;
            Ok(Some(doc.id().to_string()))
        })
        .await?;

    let Some(id) = created else {
        return Err(AppError::DuplicateEmail);
    };
    attendee.id = id;
    info!(id = %attendee.id, "Registered attendee");
    Ok(Json(attendee))
}

/// `GET /api/attendees/count`
pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let count = state
        .with_store("Failed to count attendees", |store| {
            Ok(store.collection(ATTENDEES).documents().get_all()?.len())
        })
        .await?;
    Ok(Json(CountResponse { count }))
}

/// `GET /api/admin/attendees`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Attendee>>, AppError> {
    let attendees = state
        .with_store("Failed to fetch attendees", |store| {
            store.collection(ATTENDEES).get_records::<Attendee>()
        })
        .await?;
    Ok(Json(attendees))
}

/// `DELETE /api/admin/attendees/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    delete_document(&state, ATTENDEES, id, "Failed to delete attendee").await
}
