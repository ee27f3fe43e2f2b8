//! # SSO Infrastructure
//! 
//! Registry adapters for registered services.

pub mod database;

pub use database::InMemoryRegisteredServiceRepository;
