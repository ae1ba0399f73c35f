//! API routes
//!
//! | Method | Path | Admin |
//! |--------|------|-------|
//! | GET | `/api/sessions` | |
//! | GET | `/api/speakers` | |
//! | GET | `/api/attendees/count` | |
//! | POST | `/api/attendees/register` | |
//! | POST | `/api/admin/login` | |
//! | GET | `/api/admin/attendees` | yes |
//! | GET | `/api/admin/stats` | yes |
//! | POST | `/api/admin/speakers` | yes |
//! | POST | `/api/admin/sessions` | yes |
//! | DELETE | `/api/admin/{attendees,speakers,sessions}/:id` | yes |

pub mod admin;
pub mod attendees;
pub mod sessions;
pub mod speakers;

use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use eventdesk_core::Record;
use tracing::info;

use crate::auth::require_admin;
use crate::error::AppError;
use crate::payload::StatusResponse;
use crate::state::AppState;

/// Routes under `/api`.
pub fn api(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/attendees", get(attendees::list))
        .route("/attendees/:id", delete(attendees::remove))
        .route("/stats", get(admin::stats))
        .route("/speakers", post(speakers::upsert))
        .route("/speakers/:id", delete(speakers::remove))
        .route("/sessions", post(sessions::upsert))
        .route("/sessions/:id", delete(sessions::remove))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/sessions", get(sessions::list))
        .route("/speakers", get(speakers::list))
        .route("/attendees/count", get(attendees::count))
        .route("/attendees/register", post(attendees::register))
        .route("/admin/login", post(admin::login))
        .nest("/admin", admin)
}

/// Create `record` under a generated id when `id` is empty, otherwise
/// replace the document `id`. Returns the id used.
pub(crate) async fn upsert_record<R>(
    state: &AppState,
    collection: &'static str,
    id: String,
    record: R,
    context: &'static str,
) -> Result<String, AppError>
where
    R: Record + Send + 'static,
{
    state
        .with_store(context, move |store| {
            let collection = store.collection(collection);
            if id.is_empty() {
                Ok(collection.add_record(&record)?.id().to_string())
            } else {
                collection.doc(&id).set_record(&record)?;
                Ok(id)
            }
        })
        .await
}

pub(crate) async fn delete_document(
    state: &AppState,
    collection: &'static str,
    id: String,
    context: &'static str,
) -> Result<Json<StatusResponse>, AppError> {
    state
        .with_store(context, move |store| {
            store.collection(collection).doc(&id).delete()?;
            info!(collection, id = %id, "Deleted document");
            Ok(())
        })
        .await?;
    Ok(Json(StatusResponse::DELETED))
}
