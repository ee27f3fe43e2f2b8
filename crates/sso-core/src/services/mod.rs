//! Domain services (business logic)

pub mod services_manager;
pub mod attribute_release;

pub use services_manager::{find_best_match, ServicesManager};
pub use attribute_release::{AttributeReleasePolicy, ReleasedPrincipal};
