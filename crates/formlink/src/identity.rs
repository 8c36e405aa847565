//! Build handshake between host and dialog binaries.

use crate::wire::{wire_enum, WireValue};
use crate::FormError;

wire_enum! {
    /// Build configuration label exchanged during the handshake.
    pub enum BuildKind ("build kind") {
        Debug => "debug",
        Release => "release",
    }
}

impl BuildKind {
    /// Configuration this binary was compiled with.
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildKind::Debug
        } else {
            BuildKind::Release
        }
    }
}

const DEFAULT_CONTENT_HASH: &str = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));

/// Identity a host and a dialog must agree on before any payload is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIdentity {
    content_hash: String,
    kind: BuildKind,
}

impl BuildIdentity {
    pub fn new(content_hash: impl Into<String>, kind: BuildKind) -> Self {
        Self {
            content_hash: content_hash.into(),
            kind,
        }
    }

    /// Identity baked in at compile time.
    ///
    /// The hash comes from `FORMLINK_BUILD_HASH` (typically the source
    /// revision) and falls back to the package name and version.
    pub fn current() -> Self {
        Self::new(
            option_env!("FORMLINK_BUILD_HASH").unwrap_or(DEFAULT_CONTENT_HASH),
            BuildKind::current(),
        )
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn kind(&self) -> BuildKind {
        self.kind
    }

    /// Compare against the values a host passed on the command line.
    pub fn verify(&self, expected_hash: &str, expected_kind: &str) -> Result<(), FormError> {
        if expected_hash != self.content_hash {
            return Err(FormError::HandshakeMismatch {
                field: "build hash",
                expected: expected_hash.to_string(),
                actual: self.content_hash.clone(),
            });
        }
        if BuildKind::from_wire(expected_kind) != Some(self.kind) {
            return Err(FormError::HandshakeMismatch {
                field: "build kind",
                expected: expected_kind.to_string(),
                actual: self.kind.as_str().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for BuildIdentity {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_identity_passes() {
        let identity = BuildIdentity::new("abc123", BuildKind::Release);
        identity.verify("abc123", "release").expect("handshake");
    }

    #[test]
    fn hash_mismatch_is_reported() {
        let identity = BuildIdentity::new("abc123", BuildKind::Release);
        match identity.verify("def456", "release") {
            Err(FormError::HandshakeMismatch {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "build hash");
                assert_eq!(expected, "def456");
                assert_eq!(actual, "abc123");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn kind_mismatch_and_unknown_kind_are_reported() {
        let identity = BuildIdentity::new("abc123", BuildKind::Debug);
        for kind in ["release", "profile", ""] {
            assert!(matches!(
                identity.verify("abc123", kind),
                Err(FormError::HandshakeMismatch { field: "build kind", .. })
            ));
        }
    }

    #[test]
    fn current_identity_verifies_against_itself() {
        let identity = BuildIdentity::current();
        identity
            .verify(identity.content_hash(), identity.kind().as_str())
            .expect("self handshake");
    }
}
