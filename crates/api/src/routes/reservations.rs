//! Route definitions for the `/reservations` ledger.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

/// Routes mounted at `/reservations`.
///
/// ```text
/// GET  /               -> list
/// POST /               -> create
/// POST /availability   -> availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reservations::list).post(reservations::create))
        .route("/availability", post(reservations::availability))
}
