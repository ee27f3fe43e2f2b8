//! In-memory repository implementations

pub mod registered_service_repo_impl;

pub use registered_service_repo_impl::InMemoryRegisteredServiceRepository;
