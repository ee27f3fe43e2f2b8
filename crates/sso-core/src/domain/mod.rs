//! # SSO Core - Domain Module
//! 
//! Registered service records and the access requests matched against them.

pub mod access;
pub mod service_pattern;
pub mod registered_service;

pub use access::Access;
pub use service_pattern::ServicePattern;
pub use registered_service::{RegisteredService, RegisteredServiceImpl};
