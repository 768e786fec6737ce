pub mod auth;
pub mod catalog;
pub mod health;
pub mod reference;
pub mod reservations;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                         login (public)
///
/// /catalog/summary                    portfolio and folder counts
/// /catalog/portfolios                 distinct portfolios
/// /catalog/customers                  distinct customer ids (?portfolio=)
/// /catalog/search                     filter + conflict probe (POST)
/// /catalog/reload                     invalidate cached snapshots (POST)
///
/// /reference/reasons                  reasons with required fields
/// /reference/cost-centers             cost-center names
/// /reference/managers                 manager display names
///
/// /reservations                       list (?active_only=), create (POST)
/// /reservations/availability          key availability (POST)
///
/// /session                            caller's booking session
/// /session/draft                      merge requester draft (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/catalog", catalog::router())
        .nest("/reference", reference::router())
        .nest("/reservations", reservations::router())
        .nest("/session", session::router())
}
