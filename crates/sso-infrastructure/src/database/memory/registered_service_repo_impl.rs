// ============================================================================
// SSO Infrastructure - In-Memory RegisteredService Repository
// File: crates/sso-infrastructure/src/database/memory/registered_service_repo_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use sso_core::domain::{RegisteredService, RegisteredServiceImpl};
use sso_core::error::DomainError;
use sso_core::repositories::RegisteredServiceRepository;

#[derive(Default)]
struct RegistryState {
    services: HashMap<i64, RegisteredServiceImpl>,
    last_id: i64,
}

/// Registry keeping services in process memory. Ids are never reused.
pub struct InMemoryRegisteredServiceRepository {
    state: RwLock<RegistryState>,
}

impl InMemoryRegisteredServiceRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Seed the registry, e.g. from a static service list.
    pub async fn with_services(
        services: Vec<RegisteredServiceImpl>,
    ) -> Result<Self, DomainError> {
        let repo = Self::new();
        for service in &services {
            repo.save(service).await?;
        }
        Ok(repo)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.services.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.services.is_empty()
    }
}

impl Default for InMemoryRegisteredServiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegisteredServiceRepository for InMemoryRegisteredServiceRepository {
    async fn save(
        &self,
        service: &RegisteredServiceImpl,
    ) -> Result<RegisteredServiceImpl, DomainError> {
        let mut stored = service.clone();
        stored.compiled_pattern();

        // Id assignment and insert happen under one guard
        let mut state = self.state.write().await;
        if stored.is_persisted() {
            state.last_id = state.last_id.max(stored.id());
        } else {
            state.last_id += 1;
            stored.assign_id(state.last_id)?;
        }

        let replaced = state.services.insert(stored.id(), stored.clone()).is_some();
        if replaced {
            debug!("Replaced registered service {}", stored.id());
        } else {
            info!("Registered service {} added ({})", stored.id(), stored.service_id());
        }
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<Option<RegisteredServiceImpl>, DomainError> {
        Ok(self.state.write().await.services.remove(&id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredServiceImpl>, DomainError> {
        Ok(self.state.read().await.services.get(&id).cloned())
    }

    async fn load(&self) -> Result<Vec<RegisteredServiceImpl>, DomainError> {
        Ok(self.state.read().await.services.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sso_core::domain::Access;
    use sso_core::services::{AttributeReleasePolicy, ServicesManager};
    use sso_shared::AttributeMap;

    fn service(name: &str, service_id: &str, order: i32) -> RegisteredServiceImpl {
        let mut service = RegisteredServiceImpl::new(name, service_id);
        service.set_evaluation_order(order);
        service
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = InMemoryRegisteredServiceRepository::new();
        let first = repo.save(&service("a", "https://a.org/", 0)).await.unwrap();
        let second = repo.save(&service("b", "https://b.org/", 0)).await.unwrap();
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_save_existing_replaces_value() {
        let repo = InMemoryRegisteredServiceRepository::new();
        let mut saved = repo.save(&service("a", "https://a.org/", 0)).await.unwrap();
        saved.set_name("renamed");
        repo.save(&saved).await.unwrap();

        let found = repo.find_by_id(saved.id()).await.unwrap().unwrap();
        assert_eq!(found.name(), "renamed");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_explicit_id_advances_counter() {
        let repo = InMemoryRegisteredServiceRepository::new();
        let mut seeded = service("seeded", "https://s.org/", 0);
        seeded.assign_id(10).unwrap();
        repo.save(&seeded).await.unwrap();

        let next = repo.save(&service("next", "https://n.org/", 0)).await.unwrap();
        assert_eq!(next.id(), 11);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_saves_never_share_an_id() {
        for round in 0..200 {
            let repo = Arc::new(InMemoryRegisteredServiceRepository::new());
            let mut handles = Vec::new();

            // Above any id the three fresh saves can reach before it lands
            let explicit_id = round % 3 + 4;
            let mut explicit = service("explicit", "https://explicit.org/", 0);
            explicit.assign_id(explicit_id).unwrap();
            let explicit_repo = repo.clone();
            handles.push(tokio::spawn(async move { explicit_repo.save(&explicit).await }));

            for i in 0..3 {
                let fresh_repo = repo.clone();
                let fresh = service(&format!("fresh-{}", i), "https://fresh.org/", 0);
                handles.push(tokio::spawn(async move { fresh_repo.save(&fresh).await }));
            }

            let mut ids = Vec::new();
            for handle in handles {
                ids.push(handle.await.unwrap().unwrap().id());
            }
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), 4, "round {} produced duplicate ids", round);
            assert_eq!(repo.len().await, 4);

            let stored = repo.find_by_id(explicit_id).await.unwrap().unwrap();
            assert_eq!(stored.name(), "explicit");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_fresh_saves_get_distinct_ids() {
        let repo = Arc::new(InMemoryRegisteredServiceRepository::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let repo = repo.clone();
                let fresh = service(&format!("fresh-{}", i), "https://fresh.org/", 0);
                tokio::spawn(async move { repo.save(&fresh).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=64).collect::<Vec<i64>>());
        assert_eq!(repo.len().await, 64);
    }

    #[tokio::test]
    async fn test_save_with_known_id_is_an_update() {
        let repo = InMemoryRegisteredServiceRepository::new();
        let first = repo.save(&service("first", "https://a.org/", 0)).await.unwrap();

        let mut update = service("update", "https://a.org/", 0);
        update.assign_id(first.id()).unwrap();
        repo.save(&update).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_id(first.id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "update");
    }

    #[tokio::test]
    async fn test_saved_value_carries_compiled_pattern() {
        let repo = InMemoryRegisteredServiceRepository::new();
        let saved = repo.save(&service("a", "https://a.org/**", 0)).await.unwrap();
        assert!(saved.is_pattern_compiled());

        let loaded = repo.load().await.unwrap();
        assert!(loaded.iter().all(|s| s.is_pattern_compiled()));
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let repo = InMemoryRegisteredServiceRepository::new();
        let first = repo.save(&service("a", "https://a.org/", 0)).await.unwrap();
        assert_eq!(repo.delete(first.id()).await.unwrap(), Some(first.clone()));
        assert!(repo.find_by_id(first.id()).await.unwrap().is_none());
        assert!(repo.delete(first.id()).await.unwrap().is_none());
        assert!(repo.is_empty().await);

        let second = repo.save(&service("b", "https://b.org/", 0)).await.unwrap();
        assert_ne!(second.id(), first.id());
    }

    #[tokio::test]
    async fn test_stored_value_is_independent_of_caller_copy() {
        let repo = InMemoryRegisteredServiceRepository::new();
        let mut saved = repo.save(&service("a", "https://a.org/", 0)).await.unwrap();
        saved.allowed_attributes_mut().push("mail".to_string());

        let stored = repo.find_by_id(saved.id()).await.unwrap().unwrap();
        assert!(stored.allowed_attributes().is_empty());
    }

    #[tokio::test]
    async fn test_manager_selects_by_evaluation_order_then_id() {
        let repo = InMemoryRegisteredServiceRepository::with_services(vec![
            service("catch-all", "^https?://.*", 100),
            service("r-first", "https://app.example.org/**", 10),
            service("r-second", "https://app.example.org/**", 10),
        ])
        .await
        .unwrap();
        let manager = ServicesManager::new(Arc::new(repo));

        let chosen = manager
            .authorize(&Access::new("https://APP.example.org/profile/42"))
            .await
            .unwrap();
        assert_eq!(chosen.name(), "r-first");

        let fallback = manager
            .authorize(&Access::new("http://elsewhere.example.com/"))
            .await
            .unwrap();
        assert_eq!(fallback.name(), "catch-all");
    }

    #[tokio::test]
    async fn test_manager_enable_disable_latch() {
        let manager = ServicesManager::new(Arc::new(InMemoryRegisteredServiceRepository::new()));
        let saved = manager
            .save(service("app", "https://app.example.org/", 0))
            .await
            .unwrap();
        let access = Access::new("https://app.example.org/");

        manager.disable(saved.id()).await.unwrap();
        assert_eq!(
            manager.authorize(&access).await.unwrap_err(),
            DomainError::ServiceDisabled(saved.id())
        );

        manager.enable(saved.id()).await.unwrap();
        assert!(manager.authorize(&access).await.is_ok());

        manager.delete(saved.id()).await.unwrap();
        assert!(matches!(
            manager.authorize(&access).await,
            Err(DomainError::ServiceNotRegistered(_))
        ));
        assert_eq!(
            manager.enable(saved.id()).await.unwrap_err(),
            DomainError::ServiceNotFound(saved.id())
        );
    }

    #[tokio::test]
    async fn test_manager_rejects_bad_pattern() {
        let repo = Arc::new(InMemoryRegisteredServiceRepository::new());
        let manager = ServicesManager::new(repo.clone());

        let result = manager.save(service("bad", "^https://[", 0)).await;
        assert!(matches!(result, Err(DomainError::InvalidServicePattern { .. })));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_authorized_anonymous_service_release() {
        let mut anonymous = service("anon", "https://anon.example.org/**", 0);
        anonymous.set_anonymous_access(true);
        anonymous.set_allowed_attributes(vec!["uid".to_string(), "mail".to_string()]);
        let manager = ServicesManager::new(Arc::new(
            InMemoryRegisteredServiceRepository::with_services(vec![anonymous]).await.unwrap(),
        ));

        let authorized = manager
            .authorize(&Access::new("https://anon.example.org/login"))
            .await
            .unwrap();

        let mut available = AttributeMap::new();
        available.insert("uid".to_string(), vec!["jdoe".to_string()]);
        available.insert("mail".to_string(), vec!["jdoe@example.org".to_string()]);

        let principal = AttributeReleasePolicy::default()
            .resolve(&authorized, "jdoe", &available)
            .unwrap();
        assert_ne!(principal.id, "jdoe");
        assert!(!principal.attributes.contains_key("uid"));
        assert!(principal.attributes.contains_key("mail"));
    }

    #[tokio::test]
    async fn test_loaded_services_round_trip_through_json() {
        let mut original = service("json", "https://json.example.org/**", 3);
        original.set_allowed_attributes(vec!["cn".to_string()]);
        let repo = InMemoryRegisteredServiceRepository::new();
        let saved = repo.save(&original).await.unwrap();

        let json = serde_json::to_string(&repo.load().await.unwrap()).unwrap();
        let decoded: Vec<RegisteredServiceImpl> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, vec![saved]);
    }
}
