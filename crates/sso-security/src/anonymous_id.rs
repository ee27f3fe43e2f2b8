//! Opaque per-service principal identifiers

use sha2::{Digest, Sha256};

/// Derives a stable identifier for a principal that is unique per service
/// and does not reveal the principal's real id.
#[derive(Debug, Clone, Default)]
pub struct AnonymousIdGenerator {
    salt: String,
}

impl AnonymousIdGenerator {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Hex-encoded SHA-256 over the service id, principal and salt, each
    /// length-prefixed. The service id is lower-cased since service matching
    /// ignores case.
    pub fn generate(&self, principal: &str, service_id: &str) -> String {
        let mut hasher = Sha256::new();
        update_part(&mut hasher, service_id.to_lowercase().as_bytes());
        update_part(&mut hasher, principal.as_bytes());
        update_part(&mut hasher, self.salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn update_part(hasher: &mut Sha256, part: &[u8]) {
    hasher.update((part.len() as u64).to_be_bytes());
    hasher.update(part);
}
