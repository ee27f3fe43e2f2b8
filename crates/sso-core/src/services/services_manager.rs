// ============================================================================
// SSO Core - Services Manager
// File: crates/sso-core/src/services/services_manager.rs
// ============================================================================
//! Registered service management and access authorization

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{Access, RegisteredService, RegisteredServiceImpl};
use crate::error::DomainError;
use crate::repositories::RegisteredServiceRepository;

/// Picks the service that wins a match contest: the lowest evaluation order
/// among matching services, ties broken by the lower id.
pub fn find_best_match<'a, S: RegisteredService>(
    services: &'a [S],
    service_id: &str,
) -> Option<&'a S> {
    services
        .iter()
        .filter(|s| s.matches_service_id(service_id))
        .min_by_key(|s| s.evaluation_key())
}

/// Management and lookup of registered services on top of a repository
pub struct ServicesManager<R: RegisteredServiceRepository> {
    service_repo: Arc<R>,
}

impl<R: RegisteredServiceRepository> ServicesManager<R> {
    pub fn new(service_repo: Arc<R>) -> Self {
        Self { service_repo }
    }

    /// Validate and persist a service. A malformed pattern is rejected here.
    pub async fn save(
        &self,
        service: RegisteredServiceImpl,
    ) -> Result<RegisteredServiceImpl, DomainError> {
        if let Err(e) = service.validate_for_save() {
            warn!("Rejected registered service {}: {}", service.name(), e);
            return Err(e);
        }

        let saved = self.service_repo.save(&service).await?;
        info!("Saved registered service {} ({})", saved.id(), saved.service_id());
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<RegisteredServiceImpl>, DomainError> {
        let deleted = self.service_repo.delete(id).await?;
        if deleted.is_some() {
            info!("Deleted registered service {}", id);
        }
        Ok(deleted)
    }

    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<RegisteredServiceImpl>, DomainError> {
        self.service_repo.find_by_id(id).await
    }

    /// All services in evaluation order
    pub async fn get_all_services(&self) -> Result<Vec<RegisteredServiceImpl>, DomainError> {
        let mut services = self.service_repo.load().await?;
        services.sort_by_key(|s| s.evaluation_key());
        Ok(services)
    }

    pub async fn enable(&self, id: i64) -> Result<RegisteredServiceImpl, DomainError> {
        self.set_enabled(id, true).await
    }

    pub async fn disable(&self, id: i64) -> Result<RegisteredServiceImpl, DomainError> {
        self.set_enabled(id, false).await
    }

    async fn set_enabled(
        &self,
        id: i64,
        enabled: bool,
    ) -> Result<RegisteredServiceImpl, DomainError> {
        let mut service = self
            .service_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ServiceNotFound(id))?;

        service.set_enabled(enabled);
        let saved = self.service_repo.save(&service).await?;
        info!("Registered service {} enabled={}", id, enabled);
        Ok(saved)
    }

    /// Best matching service for the request, enabled or not.
    pub async fn find_service_by(
        &self,
        access: &Access,
    ) -> Result<Option<RegisteredServiceImpl>, DomainError> {
        self.find_service_by_id(access.id()).await
    }

    pub async fn find_service_by_id(
        &self,
        service_id: &str,
    ) -> Result<Option<RegisteredServiceImpl>, DomainError> {
        let services = self.service_repo.load().await?;
        let found = find_best_match(&services, service_id).cloned();
        debug!(
            "Service lookup for {} resolved to {:?}",
            service_id,
            found.as_ref().map(|s| s.id())
        );
        Ok(found)
    }

    pub async fn matches_existing_service(&self, access: &Access) -> Result<bool, DomainError> {
        Ok(self.find_service_by(access).await?.is_some())
    }

    /// Resolve the request to the service allowed to authenticate for it.
    pub async fn authorize(&self, access: &Access) -> Result<RegisteredServiceImpl, DomainError> {
        let service = self.find_service_by(access).await?.ok_or_else(|| {
            warn!("Unauthorized access: application not registered: {}", access.id());
            DomainError::ServiceNotRegistered(access.id().to_string())
        })?;

        if !service.is_enabled() {
            warn!(
                "Unauthorized access: service {} disabled for {}",
                service.id(),
                access.id()
            );
            return Err(DomainError::ServiceDisabled(service.id()));
        }

        Ok(service)
    }

    /// Like [`authorize`](Self::authorize), additionally requiring proxy rights.
    pub async fn authorize_proxy(
        &self,
        access: &Access,
    ) -> Result<RegisteredServiceImpl, DomainError> {
        let service = self.authorize(access).await?;
        if !service.is_allowed_to_proxy() {
            warn!("Proxy request denied for service {}", service.id());
            return Err(DomainError::ProxyNotAllowed(service.id()));
        }
        Ok(service)
    }
}
