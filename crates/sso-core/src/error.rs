//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Registered service cannot be cloned: {0}")]
    CloneRefused(String),

    #[error("Invalid service pattern {service_id}: {reason}")]
    InvalidServicePattern { service_id: String, reason: String },

    #[error("Registered service id already assigned: {current} (requested {requested})")]
    IdAlreadyAssigned { current: i64, requested: i64 },

    #[error("Registered service not found: {0}")]
    ServiceNotFound(i64),

    #[error("Application not registered: {0}")]
    ServiceNotRegistered(String),

    #[error("Registered service disabled: {0}")]
    ServiceDisabled(i64),

    #[error("Registered service not allowed to proxy: {0}")]
    ProxyNotAllowed(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(err: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(err.to_string())
    }
}
