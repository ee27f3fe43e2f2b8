// ============================================================================
// SSO Core - Access Request
// File: crates/sso-core/src/domain/access.rs
// Description: Structured access attempt presented by a relying application
// ============================================================================

use serde::{Deserialize, Serialize};

/// An access attempt by a relying application. Matching only looks at `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Access {
    id: String,
    original_url: Option<String>,
    artifact_id: Option<String>,
    renew: bool,
}

impl Access {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_url: None,
            artifact_id: None,
            renew: false,
        }
    }

    pub fn with_original_url(mut self, url: impl Into<String>) -> Self {
        self.original_url = Some(url.into());
        self
    }

    pub fn with_artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = Some(artifact_id.into());
        self
    }

    pub fn with_renew(mut self, renew: bool) -> Self {
        self.renew = renew;
        self
    }

    /// Application identifier used for service matching
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original_url(&self) -> Option<&str> {
        self.original_url.as_deref()
    }

    pub fn artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    pub fn is_renew(&self) -> bool {
        self.renew
    }
}

impl From<&str> for Access {
    fn from(id: &str) -> Self {
        Access::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let access = Access::new("https://app.example.org/")
            .with_original_url("https://app.example.org/?ticket=ST-1")
            .with_artifact_id("ST-1")
            .with_renew(true);

        assert_eq!(access.id(), "https://app.example.org/");
        assert_eq!(access.original_url(), Some("https://app.example.org/?ticket=ST-1"));
        assert_eq!(access.artifact_id(), Some("ST-1"));
        assert!(access.is_renew());
    }

    #[test]
    fn test_from_str_defaults() {
        let access = Access::from("https://app.example.org/");
        assert_eq!(access.original_url(), None);
        assert_eq!(access.artifact_id(), None);
        assert!(!access.is_renew());
    }
}
