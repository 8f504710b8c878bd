//! Shared-secret gate for the admin surface.
//!
//! The operator proves access by presenting the configured password with
//! every admin request. Both sides are hashed with SHA-256 and compared in
//! constant time, so response timing reveals neither the length nor any
//! prefix of the secret.
//!
//! A gate built without a secret rejects everything.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// HTTP header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Verifies admin passwords against the configured secret.
#[derive(Clone)]
pub struct AdminGate {
    digest: Option<[u8; 32]>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl AdminGate {
    /// Build a gate for the given secret.
    ///
    /// `None` or an empty secret yields a closed gate.
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            digest: secret.filter(|s| !s.is_empty()).map(digest),
        }
    }

    /// Whether a secret is configured at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    /// Check a candidate password.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        match &self.digest {
            Some(expected) => bool::from(expected[..].ct_eq(&digest(candidate)[..])),
            None => false,
        }
    }
}
