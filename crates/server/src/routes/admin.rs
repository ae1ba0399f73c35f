use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use eventdesk_core::{Attendee, ATTENDEES};
use tracing::{info, warn};

use crate::error::AppError;
use crate::payload::{LoginRequest, LoginResponse};
use crate::state::AppState;

/// `POST /api/admin/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let Json(request) = payload?;

    if state.is_admin(Some(&request.password)) {
        info!("Admin login succeeded");
        Ok((
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: "Login successful",
            }),
        ))
    } else {
        warn!("Admin login failed");
        Ok((
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: "Invalid password",
            }),
        ))
    }
}

/// `GET /api/admin/stats`: attendee count per designation.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<HashMap<String, usize>>, AppError> {
    let attendees = state
        .with_store("Failed to fetch attendees", |store| {
            store.collection(ATTENDEES).get_records::<Attendee>()
        })
        .await?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for attendee in attendees {
        *counts.entry(attendee.designation).or_default() += 1;
    }
    Ok(Json(counts))
}
