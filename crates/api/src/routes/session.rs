//! Route definitions for the caller's `/session`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/session`.
///
/// ```text
/// GET /        -> get_session
/// PUT /draft   -> update_draft
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::get_session))
        .route("/draft", put(session::update_draft))
}
