//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the operator and session from a JWT Bearer token.

pub mod auth;
