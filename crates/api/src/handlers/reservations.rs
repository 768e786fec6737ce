//! Handlers for the `/reservations` ledger.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use fascicoli_core::admission::{Availability, FIELD_CUSTOMER_ID, FIELD_PORTFOLIO, FIELD_REASON};
use fascicoli_core::error::CoreError;
use fascicoli_core::reservation::{ReservationKey, ReservationRecord};
use fascicoli_core::session::SelectionPatch;
use fascicoli_core::types::is_blank;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub active_only: bool,
}

/// GET /api/v1/reservations?active_only=
///
/// The ledger ordered by request date.
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<ReservationRecord>>>> {
    let rows = state.booking.reservations(params.active_only).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/reservations/availability
pub async fn availability(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(key): Json<ReservationKey>,
) -> AppResult<Json<DataResponse<Availability>>> {
    for (field, value) in [
        (FIELD_CUSTOMER_ID, &key.customer_id),
        (FIELD_PORTFOLIO, &key.portfolio),
        (FIELD_REASON, &key.reason),
    ] {
        if is_blank(value) {
            return Err(CoreError::missing(field).into());
        }
    }
    let availability = state.booking.availability(&key).await?;
    Ok(Json(DataResponse { data: availability }))
}

/// POST /api/v1/reservations
///
/// Book a folder. Fields absent from the body are taken from the caller's
/// session. The requester values are kept in the session draft so a
/// rejected attempt can be retried; a successful booking resets the session.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<SelectionPatch>,
) -> AppResult<(StatusCode, Json<DataResponse<ReservationRecord>>)> {
    let draft = patch.requester.clone();
    let selection = state
        .sessions
        .with_session(user.session_id, |s| {
            s.update_draft(draft);
            s.fill(patch)
        })
        .await;

    let record = state.booking.book(&selection).await?;

    state
        .sessions
        .with_session(user.session_id, |s| s.complete_booking())
        .await;

    tracing::info!(
        username = %user.username,
        key = %record.key(),
        "Reservation created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}
