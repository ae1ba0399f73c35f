use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use eventdesk_core::{Speaker, SPEAKERS};
use tracing::info;

use super::{delete_document, upsert_record};
use crate::error::AppError;
use crate::payload::{SpeakerRequest, StatusResponse};
use crate::state::AppState;

/// `GET /api/speakers`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Speaker>>, AppError> {
    let speakers = state
        .with_store("Failed to fetch speakers", |store| {
            store.collection(SPEAKERS).get_records::<Speaker>()
        })
        .await?;
    Ok(Json(speakers))
}

/// `POST /api/admin/speakers`
pub async fn upsert(
    State(state): State<AppState>,
    payload: Result<Json<SpeakerRequest>, JsonRejection>,
) -> Result<Json<Speaker>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let mut speaker = request.into_speaker();
    speaker.id = upsert_record(
        &state,
        SPEAKERS,
        speaker.id.clone(),
        speaker.clone(),
        "Failed to save speaker",
    )
    .await?;
    info!(id = %speaker.id, "Saved speaker");
    Ok(Json(speaker))
}

/// `DELETE /api/admin/speakers/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    delete_document(&state, SPEAKERS, id, "Failed to delete speaker").await
}
