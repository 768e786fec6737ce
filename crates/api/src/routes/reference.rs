//! Route definitions for the `/reference` option lists.

use axum::routing::get;
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// Routes mounted at `/reference`.
///
/// ```text
/// GET /reasons        -> reasons
/// GET /cost-centers   -> cost_centers
/// GET /managers       -> managers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reasons", get(reference::reasons))
        .route("/cost-centers", get(reference::cost_centers))
        .route("/managers", get(reference::managers))
}
