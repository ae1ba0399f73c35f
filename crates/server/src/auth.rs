//! Admin password check
//!
//! Admin routes compare the `X-Admin-Password` header against the configured
//! password on every call. There are no sessions or tokens.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the admin password
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Middleware rejecting requests without the admin password.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok());

    if !state.is_admin(supplied) {
        debug!(
            path = %request.uri().path(),
            header_present = supplied.is_some(),
            "Admin check failed"
        );
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}
