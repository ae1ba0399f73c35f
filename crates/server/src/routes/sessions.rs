use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use eventdesk_core::{Session, Speaker, SESSIONS, SPEAKERS};
use tracing::info;

use super::{delete_document, upsert_record};
use crate::error::AppError;
use crate::payload::{SessionRequest, SessionWithSpeaker, StatusResponse};
use crate::state::AppState;

/// `GET /api/sessions`
///
/// Sessions whose speaker id does not resolve are returned without one.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionWithSpeaker>>, AppError> {
    let (sessions, speakers) = state
        .with_store("Failed to fetch sessions", |store| {
            let sessions = store.collection(SESSIONS).get_records::<Session>()?;
            let speakers = store.collection(SPEAKERS).get_records::<Speaker>()?;
            Ok((sessions, speakers))
        })
        .await?;

    let by_id: HashMap<String, Speaker> = speakers
        .into_iter()
        .map(|speaker| (speaker.id.clone(), speaker))
        .collect();

    let joined = sessions
        .into_iter()
        .map(|session| {
            let speaker = by_id.get(&session.speaker_id).cloned();
            SessionWithSpeaker { session, speaker }
        })
        .collect();
    Ok(Json(joined))
}

/// `POST /api/admin/sessions`
pub async fn upsert(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<Session>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let mut session = request.into_session();
    session.id = upsert_record(
        &state,
        SESSIONS,
        session.id.clone(),
        session.clone(),
        "Failed to save session",
    )
    .await?;
    info!(id = %session.id, "Saved session");
    Ok(Json(session))
}

/// `DELETE /api/admin/sessions/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    delete_document(&state, SESSIONS, id, "Failed to delete session").await
}
