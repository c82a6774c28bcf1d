//! The session aggregate handed to callers
//!
//! An [`AuthenticationSession`] carries one principal's identity, the
//! authority list computed from their claims, and the currently installed
//! token bundle. It performs no I/O itself: the surrounding refresh loop
//! watches the expiry queries and talks to the provider, then installs
//! the bundle it obtained.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::claims::build_authorities;
use crate::models::{ClaimsError, IdentityClaims, TokenBundle};
use crate::session::expiry::{RefreshClock, TokenKind};

/// Bundle and clock, replaced together under one write lock so a reader
/// never observes a bundle paired with a stale install timestamp.
#[derive(Debug)]
struct TokenState {
    bundle: Option<TokenBundle>,
    clock: RefreshClock,
}

/// One authenticated principal's session state.
///
/// The username and authority list are fixed at construction and never
/// recomputed; only the token bundle changes, and only by wholesale
/// replacement. The session may be shared across request handlers, so
/// the bundle and its install timestamp live behind one lock.
#[derive(Debug)]
pub struct AuthenticationSession {
    username: String,
    authorities: Vec<String>,
    authenticated: bool,
    state: RwLock<TokenState>,
}

impl AuthenticationSession {
    /// Build a session from a successful provider exchange.
    ///
    /// Aggregates the authority list from `claims` scoped to
    /// `resource_id`, installs `bundle` at the current instant, and marks
    /// the session authenticated.
    #[must_use]
    pub fn new(claims: &IdentityClaims, bundle: TokenBundle, resource_id: &str) -> Self {
        Self::new_at(claims, bundle, resource_id, Utc::now())
    }

    /// Like [`AuthenticationSession::new`] with an explicit install
    /// instant, for deterministic expiry behavior.
    #[must_use]
    pub fn new_at(
        claims: &IdentityClaims,
        bundle: TokenBundle,
        resource_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let session = Self::without_bundle(claims, resource_id);
        session.install_bundle_at(bundle, now);
        session
    }

    /// Build a session with no bundle installed yet.
    ///
    /// Both expiry queries report expired until the first
    /// [`AuthenticationSession::install_bundle`], which forces the
    /// refresh loop to acquire tokens before first use.
    #[must_use]
    pub fn without_bundle(claims: &IdentityClaims, resource_id: &str) -> Self {
        let authorities = build_authorities(claims, resource_id);
        info!(
            "Created session for user {} with {} authorities",
            claims.preferred_username,
            authorities.len()
        );

        Self {
            username: claims.preferred_username.clone(),
            authorities,
            authenticated: true,
            state: RwLock::new(TokenState {
                bundle: None,
                clock: RefreshClock::new(),
            }),
        }
    }

    /// Build a session from a raw claims payload as decoded from a
    /// provider token.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::Malformed`] if the payload is not a claims
    /// object.
    pub fn from_claims_value(
        value: serde_json::Value,
        bundle: TokenBundle,
        resource_id: &str,
    ) -> Result<Self, ClaimsError> {
        let claims = IdentityClaims::from_value(value)?;
        Ok(Self::new(&claims, bundle, resource_id))
    }

    /// Username asserted by the provider.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The principal behind this session; identical to the username.
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.username
    }

    /// Ordered authority list computed at construction.
    ///
    /// Never recomputed on refresh; always ends with
    /// [`crate::claims::AUTHENTICATED_AUTHORITY`].
    #[must_use]
    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    /// Whether this session has been authenticated. True for every
    /// constructed session.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Generic credential accessor, always empty.
    ///
    /// Do not expose the credential here: callers that need raw token
    /// material go through [`AuthenticationSession::access_token`] and
    /// [`AuthenticationSession::refresh_token`] deliberately.
    #[must_use]
    pub fn credentials(&self) -> &str {
        ""
    }

    /// Install a freshly issued bundle, replacing the current one.
    pub fn install_bundle(&self, bundle: TokenBundle) {
        self.install_bundle_at(bundle, Utc::now());
    }

    /// Like [`AuthenticationSession::install_bundle`] with an explicit
    /// install instant.
    ///
    /// The bundle and its install timestamp are replaced together under
    /// one write lock. Concurrent installs are last-writer-wins; a reader
    /// never sees a partially applied pair.
    pub fn install_bundle_at(&self, bundle: TokenBundle, now: DateTime<Utc>) {
        let mut state = self.write_state();
        state.clock.reset(&bundle, now);
        state.bundle = Some(bundle);
        drop(state);
        debug!("Installed new token bundle for user {}", self.username);
    }

    /// Raw access token for the provider-integration layer, or `None`
    /// before the first install.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read_state()
            .bundle
            .as_ref()
            .map(|bundle| bundle.access_token().to_string())
    }

    /// Raw refresh token for the provider-integration layer, or `None`
    /// before the first install. Always the token carried by the most
    /// recently installed bundle.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read_state()
            .bundle
            .as_ref()
            .map(|bundle| bundle.refresh_token().to_string())
    }

    /// The current bundle together with its install instant, read as one
    /// consistent pair.
    #[must_use]
    pub fn current_bundle(&self) -> Option<(TokenBundle, DateTime<Utc>)> {
        let state = self.read_state();
        match (&state.bundle, state.clock.installed_at()) {
            (Some(bundle), Some(at)) => Some((bundle.clone(), at)),
            _ => None,
        }
    }

    /// Instant the current bundle was installed, or `None` before the
    /// first install.
    #[must_use]
    pub fn last_installed_at(&self) -> Option<DateTime<Utc>> {
        self.read_state().clock.installed_at()
    }

    /// Whether the access token has outlived its declared lifetime.
    #[must_use]
    pub fn is_access_expired(&self) -> bool {
        self.is_access_expired_at(Utc::now())
    }

    /// [`AuthenticationSession::is_access_expired`] against an explicit
    /// instant.
    #[must_use]
    pub fn is_access_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.read_state().clock.is_expired_at(TokenKind::Access, now)
    }

    /// Whether the refresh token has outlived its declared lifetime.
    #[must_use]
    pub fn is_refresh_expired(&self) -> bool {
        self.is_refresh_expired_at(Utc::now())
    }

    /// [`AuthenticationSession::is_refresh_expired`] against an explicit
    /// instant.
    #[must_use]
    pub fn is_refresh_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.read_state().clock.is_expired_at(TokenKind::Refresh, now)
    }

    // A panicked writer cannot leave a torn pair behind because the pair
    // is replaced by value, so a poisoned lock is safe to enter.
    fn read_state(&self) -> RwLockReadGuard<'_, TokenState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TokenState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
