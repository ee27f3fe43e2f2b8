//! Database module (registry adapters)

pub mod memory;

pub use memory::InMemoryRegisteredServiceRepository;
