//! Route definitions for the `/catalog` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`.
///
/// ```text
/// GET  /summary      -> summary
/// GET  /portfolios   -> portfolios
/// GET  /customers    -> customers
/// POST /search       -> search
/// POST /reload       -> reload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(catalog::summary))
        .route("/portfolios", get(catalog::portfolios))
        .route("/customers", get(catalog::customers))
        .route("/search", post(catalog::search))
        .route("/reload", post(catalog::reload))
}
