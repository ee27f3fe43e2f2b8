//! # SSO Security
//! 
//! Security utilities: opaque principal identifiers for anonymous access.

pub mod anonymous_id;

pub use anonymous_id::AnonymousIdGenerator;
