//! Shared-secret instructor authentication.
//!
//! Instructor operations on [`crate::simulation::Simulation`] take an
//! [`AdminGrant`], which can only be obtained from [`AdminToken::authorize`].

use crate::error::{Result, SimError};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

const DIGEST_KEY: &[u8] = b"pressure/admin-token/v1";

fn digest(token: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(DIGEST_KEY).ok()?;
    mac.update(token.as_bytes());
    Some(mac)
}

/// The configured instructor token, held only as a keyed digest.
///
/// With no token configured every check fails.
#[derive(Clone)]
pub struct AdminToken {
    expected: Option<Vec<u8>>,
}

impl AdminToken {
    /// Blank or whitespace-only tokens count as not configured.
    pub fn new(token: Option<&str>) -> Self {
        let expected = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .and_then(digest)
            .map(|mac| mac.finalize().into_bytes().to_vec());
        Self { expected }
    }

    pub fn disabled() -> Self {
        Self { expected: None }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    /// Constant-time comparison of `provided` against the configured token.
    pub fn can_administer(&self, provided: Option<&str>) -> bool {
        let (Some(expected), Some(provided)) = (self.expected.as_deref(), provided) else {
            return false;
        };
        digest(provided.trim()).is_some_and(|mac| mac.verify_slice(expected).is_ok())
    }

    pub fn authorize(&self, provided: Option<&str>) -> Result<AdminGrant> {
        if self.can_administer(provided) {
            Ok(AdminGrant { _private: () })
        } else {
            Err(SimError::Unauthorized)
        }
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminToken")
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Proof that the caller presented the instructor token.
#[derive(Debug)]
pub struct AdminGrant {
    _private: (),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_token_is_accepted() {
        let token = AdminToken::new(Some("s3cret"));
        assert!(token.can_administer(Some("s3cret")));
        assert!(token.authorize(Some("s3cret")).is_ok());
    }

    #[test]
    fn wrong_or_missing_token_is_rejected() {
        let token = AdminToken::new(Some("s3cret"));
        assert!(!token.can_administer(Some("s3cre")));
        assert!(!token.can_administer(Some("s3cret!")));
        assert!(!token.can_administer(None));
        assert!(matches!(
            token.authorize(Some("nope")),
            Err(SimError::Unauthorized)
        ));
    }

    #[test]
    fn unconfigured_token_rejects_everything() {
        for token in [AdminToken::new(None), AdminToken::new(Some("  ")), AdminToken::disabled()] {
            assert!(!token.is_configured());
            assert!(!token.can_administer(None));
            assert!(!token.can_administer(Some("")));
        }
    }

    #[test]
    fn debug_does_not_leak_token() {
        let token = AdminToken::new(Some("s3cret"));
        let dbg = format!("{token:?}");
        assert!(!dbg.contains("s3cret"));
        assert!(dbg.contains("configured: true"));
    }
}
