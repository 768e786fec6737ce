use crate::reservation::ReservationKey;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No catalog item matches customer {customer_id} in portfolio '{portfolio}'")]
    NoMatch {
        customer_id: String,
        portfolio: String,
    },

    #[error("An active reservation already exists for {}", .key.canonical())]
    DuplicateReservation { key: ReservationKey },

    #[error("No cost-center mapping for customer {customer_id} and cost center '{cost_center}'")]
    MappingNotFound {
        customer_id: String,
        cost_center: String,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn missing(field: impl Into<String>) -> Self {
        CoreError::MissingField {
            field: field.into(),
        }
    }
}
