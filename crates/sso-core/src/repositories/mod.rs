//! Repository traits (ports)

pub mod registered_service_repository;

pub use registered_service_repository::RegisteredServiceRepository;

#[cfg(test)]
pub use registered_service_repository::MockRegisteredServiceRepository;
