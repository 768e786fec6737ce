//! Handlers for the caller's `/session`.

use axum::extract::State;
use axum::Json;
use fascicoli_core::session::{BookingSession, RequesterDraft};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/session
pub async fn get_session(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BookingSession>>> {
    let session = state.sessions.snapshot(user.session_id).await;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/session/draft
///
/// Merge the supplied requester fields into the draft.
pub async fn update_draft(
    user: AuthUser,
    State(state): State<AppState>,
    Json(update): Json<RequesterDraft>,
) -> AppResult<Json<DataResponse<BookingSession>>> {
    let session = state
        .sessions
        .with_session(user.session_id, |s| {
            s.update_draft(update);
            s.clone()
        })
        .await;
    Ok(Json(DataResponse { data: session }))
}
