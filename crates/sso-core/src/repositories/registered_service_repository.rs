//! Registered service repository trait (port)

use async_trait::async_trait;
use crate::domain::RegisteredServiceImpl;
use crate::error::DomainError;

/// Storage of registered services. Updates replace the stored value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegisteredServiceRepository: Send + Sync {
    /// Persists the service, assigning an id when it has none yet.
    async fn save(
        &self,
        service: &RegisteredServiceImpl,
    ) -> Result<RegisteredServiceImpl, DomainError>;
    async fn delete(&self, id: i64) -> Result<Option<RegisteredServiceImpl>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredServiceImpl>, DomainError>;
    async fn load(&self) -> Result<Vec<RegisteredServiceImpl>, DomainError>;
}
