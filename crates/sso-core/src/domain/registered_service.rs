// ============================================================================
// SSO Core - Registered Service Entity
// File: crates/sso-core/src/domain/registered_service.rs
// Description: Policy and metadata record of a relying application
// ============================================================================

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use validator::Validate;

use sso_shared::constants::{
    MAX_DESCRIPTION_LENGTH, MAX_SERVICE_ID_LENGTH, MAX_SERVICE_NAME_LENGTH, MAX_THEME_LENGTH,
    UNASSIGNED_SERVICE_ID,
};
use sso_shared::utils::is_blank;

use crate::domain::{Access, ServicePattern};
use crate::error::DomainError;

/// A service that can be registered through the services management surface.
///
/// Accessors are side-effect free. Matching is case-insensitive on both the
/// service id pattern and the incoming identifier.
pub trait RegisteredService: fmt::Debug + Send + Sync {
    fn id(&self) -> i64;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Pattern matched against incoming application identifiers.
    fn service_id(&self) -> &str;

    /// Short theme name, not required to be unique.
    fn theme(&self) -> &str;

    /// Is this application currently allowed to use SSO at all?
    fn is_enabled(&self) -> bool;

    /// Does this application participate in an existing SSO session?
    fn is_sso_enabled(&self) -> bool;

    fn is_allowed_to_proxy(&self) -> bool;

    /// Anonymous access must not reveal identifying information such as the user id.
    fn is_anonymous_access(&self) -> bool;

    /// When set, `allowed_attributes` is not consulted.
    fn is_ignore_attributes(&self) -> bool;

    fn allowed_attributes(&self) -> &[String];

    /// Lower values are evaluated for a match before others.
    fn evaluation_order(&self) -> i32;

    /// Shape-match of a raw application identifier. Policy free: a disabled
    /// service still reports a match.
    fn matches_service_id(&self, id: &str) -> bool;

    /// Deep copy of the service. Implementations may refuse with
    /// [`DomainError::CloneRefused`].
    fn duplicate(&self) -> Result<Box<dyn RegisteredService>, DomainError>;

    fn matches(&self, access: &Access) -> bool {
        self.matches_service_id(access.id())
    }

    /// Must the user present credentials again instead of reusing the SSO session?
    fn requires_credentials(&self) -> bool {
        !self.is_sso_enabled()
    }

    /// Ordering key used when several services match: evaluation order, then id.
    fn evaluation_key(&self) -> (i32, i64) {
        (self.evaluation_order(), self.id())
    }
}

/// Default registered service record.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisteredServiceImpl {
    id: i64,

    #[validate(length(max = MAX_SERVICE_NAME_LENGTH, message = "Name too long"))]
    name: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH, message = "Description too long"))]
    description: String,

    #[validate(length(
        min = 1,
        max = MAX_SERVICE_ID_LENGTH,
        message = "Service id must be between 1 and 2048 characters"
    ))]
    service_id: String,

    #[validate(length(max = MAX_THEME_LENGTH, message = "Theme too long"))]
    theme: String,

    enabled: bool,
    sso_enabled: bool,
    allowed_to_proxy: bool,
    anonymous_access: bool,
    ignore_attributes: bool,
    allowed_attributes: Vec<String>,
    evaluation_order: i32,

    #[serde(skip)]
    pattern: OnceLock<ServicePattern>,
}

impl Default for RegisteredServiceImpl {
    fn default() -> Self {
        Self {
            id: UNASSIGNED_SERVICE_ID,
            name: String::new(),
            description: String::new(),
            service_id: String::new(),
            theme: String::new(),
            enabled: true,
            sso_enabled: true,
            allowed_to_proxy: true,
            anonymous_access: false,
            ignore_attributes: false,
            allowed_attributes: Vec::new(),
            evaluation_order: 0,
            pattern: OnceLock::new(),
        }
    }
}

impl RegisteredServiceImpl {
    /// Create new, not yet persisted, registered service
    pub fn new(name: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            service_id: service_id.into().trim().to_string(),
            ..Self::default()
        }
    }

    /// Whether the registry has assigned an id yet
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_SERVICE_ID
    }

    /// Assign the registry id. Once assigned it cannot change.
    pub fn assign_id(&mut self, id: i64) -> Result<(), DomainError> {
        if self.is_persisted() && self.id != id {
            return Err(DomainError::IdAlreadyAssigned {
                current: self.id,
                requested: id,
            });
        }
        self.id = id;
        Ok(())
    }

    /// Field validation plus a compile check of the service id pattern.
    /// The compiled pattern is kept, so clones handed to the registry carry it.
    pub fn validate_for_save(&self) -> Result<(), DomainError> {
        self.validate()?;
        if is_blank(&self.service_id) {
            return Err(DomainError::ValidationError("Service id must not be blank".to_string()));
        }
        let pattern = ServicePattern::parse(&self.service_id)?;
        let _ = self.pattern.set(pattern);
        Ok(())
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_service_id(&mut self, service_id: impl Into<String>) {
        self.service_id = service_id.into();
        self.pattern = OnceLock::new();
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_sso_enabled(&mut self, sso_enabled: bool) {
        self.sso_enabled = sso_enabled;
    }

    pub fn set_allowed_to_proxy(&mut self, allowed_to_proxy: bool) {
        self.allowed_to_proxy = allowed_to_proxy;
    }

    pub fn set_anonymous_access(&mut self, anonymous_access: bool) {
        self.anonymous_access = anonymous_access;
    }

    pub fn set_ignore_attributes(&mut self, ignore_attributes: bool) {
        self.ignore_attributes = ignore_attributes;
    }

    pub fn set_allowed_attributes(&mut self, allowed_attributes: Vec<String>) {
        self.allowed_attributes = allowed_attributes;
    }

    pub fn allowed_attributes_mut(&mut self) -> &mut Vec<String> {
        &mut self.allowed_attributes
    }

    pub fn set_evaluation_order(&mut self, evaluation_order: i32) {
        self.evaluation_order = evaluation_order;
    }

    /// Compiled service id, built on first use.
    pub fn compiled_pattern(&self) -> &ServicePattern {
        self.pattern.get_or_init(|| ServicePattern::new(&self.service_id))
    }

    pub fn is_pattern_compiled(&self) -> bool {
        self.pattern.get().is_some()
    }
}

impl RegisteredService for RegisteredServiceImpl {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn theme(&self) -> &str {
        &self.theme
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_sso_enabled(&self) -> bool {
        self.sso_enabled
    }

    fn is_allowed_to_proxy(&self) -> bool {
        self.allowed_to_proxy
    }

    fn is_anonymous_access(&self) -> bool {
        self.anonymous_access
    }

    fn is_ignore_attributes(&self) -> bool {
        self.ignore_attributes
    }

    fn allowed_attributes(&self) -> &[String] {
        &self.allowed_attributes
    }

    fn evaluation_order(&self) -> i32 {
        self.evaluation_order
    }

    fn matches_service_id(&self, id: &str) -> bool {
        self.compiled_pattern().is_match(id)
    }

    fn duplicate(&self) -> Result<Box<dyn RegisteredService>, DomainError> {
        Ok(Box::new(self.clone()))
    }
}

impl PartialEq for RegisteredServiceImpl {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && self.service_id.to_lowercase() == other.service_id.to_lowercase()
            && self.theme == other.theme
            && self.enabled == other.enabled
            && self.sso_enabled == other.sso_enabled
            && self.allowed_to_proxy == other.allowed_to_proxy
            && self.anonymous_access == other.anonymous_access
            && self.ignore_attributes == other.ignore_attributes
            && self.allowed_attributes == other.allowed_attributes
            && self.evaluation_order == other.evaluation_order
    }
}

impl Eq for RegisteredServiceImpl {}
