//! # SSO Core
//! 
//! Registered service records, the services manager, and the registry port.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
