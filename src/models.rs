//! Data model for provider-issued claims and token material
//!
//! [`IdentityClaims`] mirrors the JSON wire shape of a decoded OIDC token
//! payload so it can be deserialized straight from a provider response.
//! [`TokenBundle`] carries one access/refresh token pair together with the
//! lifetimes the provider declared for them.

use std::collections::HashMap;
use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a raw claims payload cannot be interpreted.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The payload was not an object of the expected claims shape.
    #[error("malformed claims payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Role names nested under a realm or resource entry, in the
/// `{"roles": [...]}` shape providers emit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleClaims {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Claims payload asserted by the identity provider about a principal.
///
/// Every role source is optional. Absent sources deserialize to their
/// empty defaults and are skipped during aggregation; they are never an
/// error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Preferred username claim.
    #[serde(default)]
    pub preferred_username: String,

    /// Realm-level role names.
    #[serde(default)]
    pub realm_access: Option<RoleClaims>,

    /// Generic top-level roles claim, a vendor-specific extension point.
    #[serde(default)]
    pub roles: Option<Vec<String>>,

    /// Per-resource role names keyed by resource identifier.
    #[serde(default)]
    pub resource_access: HashMap<String, RoleClaims>,
}

impl IdentityClaims {
    /// Parse a raw claims payload as decoded from a provider token.
    ///
    /// Unknown claims are ignored and absent role sources are fine; only
    /// a payload that is not an object of the expected shape is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::Malformed`] if the payload cannot be
    /// deserialized into a claims object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ClaimsError> {
        serde_json::from_value(value).map_err(ClaimsError::Malformed)
    }
}

/// One access/refresh token pair plus the lifetimes the provider declared
/// for them, using the token-response wire names.
///
/// A bundle is immutable once constructed; a refresh produces a brand-new
/// bundle rather than mutating the old one.
#[derive(Clone, Deserialize)]
pub struct TokenBundle {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    refresh_expires_in: u64,
}

impl TokenBundle {
    /// Create a bundle from raw token material and declared lifetimes in
    /// seconds.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: u64,
        refresh_expires_in: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            refresh_expires_in,
        }
    }

    /// Raw access token string.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Raw refresh token string.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Declared access-token lifetime in seconds.
    #[must_use]
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// Declared refresh-token lifetime in seconds.
    #[must_use]
    pub fn refresh_expires_in(&self) -> u64 {
        self.refresh_expires_in
    }

    /// Declared access-token lifetime. Lifetimes beyond the representable
    /// range saturate rather than fail.
    #[must_use]
    pub fn access_lifetime(&self) -> Duration {
        Self::lifetime(self.expires_in)
    }

    /// Declared refresh-token lifetime. Lifetimes beyond the representable
    /// range saturate rather than fail.
    #[must_use]
    pub fn refresh_lifetime(&self) -> Duration {
        Self::lifetime(self.refresh_expires_in)
    }

    fn lifetime(seconds: u64) -> Duration {
        i64::try_from(seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .finish()
    }
}
