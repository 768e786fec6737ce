//! Handlers for the `/reference` option lists.

use axum::extract::State;
use axum::Json;
use fascicoli_core::requirements::ReasonRule;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reference/reasons
///
/// Every reason with the companion fields it requires.
pub async fn reasons(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ReasonRule>>>> {
    let rules = state.booking.requirements().rules.clone();
    Ok(Json(DataResponse { data: rules }))
}

/// GET /api/v1/reference/cost-centers
///
/// Empty when the deployment has no cost-center table.
pub async fn cost_centers(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let names = state.booking.cost_center_names().await?;
    Ok(Json(DataResponse { data: names }))
}

/// GET /api/v1/reference/managers
pub async fn managers(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let names = state.booking.managers().await?;
    Ok(Json(DataResponse { data: names }))
}
