use std::sync::Arc;

use fascicoli_core::booking::BookingService;

use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Booking orchestration over the configured stores.
    pub booking: Arc<BookingService>,
    pub config: Arc<ServerConfig>,
    /// Per-login search and draft state.
    pub sessions: Arc<SessionRegistry>,
}
