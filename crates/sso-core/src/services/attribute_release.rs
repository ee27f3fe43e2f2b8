// ============================================================================
// SSO Core - Attribute Release
// File: crates/sso-core/src/services/attribute_release.rs
// ============================================================================
//! Principal attribute release according to a registered service's policy

use std::collections::BTreeSet;
use tracing::debug;

use sso_security::AnonymousIdGenerator;
use sso_shared::config::ServicesSettings;
use sso_shared::utils::mask_identifier;
use sso_shared::AttributeMap;

use crate::domain::RegisteredService;
use crate::error::DomainError;

/// Principal as seen by a relying application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedPrincipal {
    pub id: String,
    pub attributes: AttributeMap,
}

/// Deployment policy deciding which attributes a service receives.
#[derive(Debug, Clone)]
pub struct AttributeReleasePolicy {
    /// Lower-cased names of identity-bearing attributes
    identity_attributes: BTreeSet<String>,
    id_generator: AnonymousIdGenerator,
}

impl AttributeReleasePolicy {
    pub fn new<I, S>(identity_attributes: I, id_generator: AnonymousIdGenerator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            identity_attributes: identity_attributes
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
            id_generator,
        }
    }

    pub fn from_settings(settings: &ServicesSettings) -> Self {
        Self::new(
            &settings.identity_attributes,
            AnonymousIdGenerator::new(settings.anonymous_salt.clone()),
        )
    }

    pub fn is_identity_attribute(&self, name: &str) -> bool {
        self.identity_attributes.contains(&name.to_lowercase())
    }

    /// Attributes the service may receive out of `available`.
    ///
    /// With `ignore_attributes` everything available is the base set,
    /// otherwise the allow-list intersected with `available`. Anonymous
    /// access then strips identity-bearing attributes.
    pub fn release(
        &self,
        service: &dyn RegisteredService,
        available: &AttributeMap,
    ) -> AttributeMap {
        let mut released: AttributeMap = if service.is_ignore_attributes() {
            available.clone()
        } else {
            service
                .allowed_attributes()
                .iter()
                .filter_map(|name| available.get_key_value(name))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect()
        };

        if service.is_anonymous_access() {
            released.retain(|name, _| !self.is_identity_attribute(name));
        }

        debug!(
            "Releasing {} of {} attributes to service {}",
            released.len(),
            available.len(),
            service.id()
        );
        released
    }

    /// Principal id handed to the service; opaque under anonymous access.
    pub fn principal_id(&self, service: &dyn RegisteredService, principal: &str) -> String {
        if service.is_anonymous_access() {
            self.id_generator.generate(principal, service.service_id())
        } else {
            principal.to_string()
        }
    }

    pub fn resolve(
        &self,
        service: &dyn RegisteredService,
        principal: &str,
        available: &AttributeMap,
    ) -> Result<ReleasedPrincipal, DomainError> {
        if !service.is_enabled() {
            return Err(DomainError::ServiceDisabled(service.id()));
        }

        debug!(
            "Resolving principal {} for service {}",
            mask_identifier(principal),
            service.id()
        );
        Ok(ReleasedPrincipal {
            id: self.principal_id(service, principal),
            attributes: self.release(service, available),
        })
    }
}

impl Default for AttributeReleasePolicy {
    fn default() -> Self {
        Self::from_settings(&ServicesSettings::default())
    }
}
