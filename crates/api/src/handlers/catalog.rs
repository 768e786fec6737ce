//! Handlers for the `/catalog` resource.

use axum::extract::{Query, State};
use axum::Json;
use fascicoli_core::admission::FIELD_CUSTOMER_ID;
use fascicoli_core::booking::SearchOutcome;
use fascicoli_core::catalog::{CatalogQuery, CatalogSummary};
use fascicoli_core::error::CoreError;
use fascicoli_core::types::is_blank;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomersParams {
    pub portfolio: Option<String>,
}

/// Request body for `POST /catalog/search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub customer_id: String,
    #[serde(default)]
    pub portfolio: Option<String>,
    /// When set, the response reports an active reservation on the key.
    #[serde(default)]
    pub reason: Option<String>,
}

/// GET /api/v1/catalog/summary
pub async fn summary(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CatalogSummary>>> {
    let summary = state.booking.summary().await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/catalog/portfolios
pub async fn portfolios(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let portfolios = state.booking.portfolios().await?;
    Ok(Json(DataResponse { data: portfolios }))
}

/// GET /api/v1/catalog/customers?portfolio=
///
/// Distinct customer ids, optionally within one portfolio.
pub async fn customers(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CustomersParams>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let portfolio = params.portfolio.as_deref().filter(|p| !is_blank(p));
    let ids = state.booking.customer_ids(portfolio).await?;
    Ok(Json(DataResponse { data: ids }))
}

/// POST /api/v1/catalog/search
///
/// Filter the catalog and start a new search in the caller's session.
/// An empty `items` list is the no-match outcome, not an error.
pub async fn search(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SearchRequest>,
) -> AppResult<Json<DataResponse<SearchOutcome>>> {
    if is_blank(&input.customer_id) {
        return Err(CoreError::missing(FIELD_CUSTOMER_ID).into());
    }

    let query = CatalogQuery {
        customer_id: input.customer_id.trim().to_string(),
        portfolio: input
            .portfolio
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
    };
    let reason = input.reason.filter(|r| !is_blank(r));

    let outcome = state.booking.search(&query, reason.as_deref()).await?;

    state
        .sessions
        .with_session(user.session_id, |s| s.begin_search(query, reason))
        .await;

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/catalog/reload
///
/// Drop every cached snapshot and return the freshly loaded summary.
pub async fn reload(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CatalogSummary>>> {
    state.booking.reload().await;
    tracing::info!(username = %user.username, "Manual reload requested");
    let summary = state.booking.summary().await?;
    Ok(Json(DataResponse { data: summary }))
}
