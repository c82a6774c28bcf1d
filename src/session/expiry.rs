//! Token freshness tracking
//!
//! A [`RefreshClock`] remembers when the current token bundle was
//! installed and answers, for a supplied instant, whether each token kind
//! has outlived its declared lifetime. Freshness is measured from the
//! local installation instant rather than any provider-supplied issuance
//! timestamp, so the answers do not depend on the provider's clock being
//! in sync with ours.

use chrono::{DateTime, Duration, Utc};

use crate::models::TokenBundle;

/// The two token kinds whose freshness is tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Copy)]
struct Installed {
    at: DateTime<Utc>,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

/// Tracks when the current token bundle was installed.
///
/// A clock that has never seen an install reports both kinds expired,
/// which forces the surrounding refresh loop to acquire tokens before
/// first use. Expiry is never an error; callers poll the boolean queries
/// at the point of use.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshClock {
    installed: Option<Installed>,
}

impl RefreshClock {
    /// Create a clock with no install recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `bundle` was installed at `now`.
    ///
    /// Snapshots the bundle's declared lifetimes; both kinds become fresh
    /// again, subject to those lifetimes.
    pub fn reset(&mut self, bundle: &TokenBundle, now: DateTime<Utc>) {
        self.installed = Some(Installed {
            at: now,
            access_lifetime: bundle.access_lifetime(),
            refresh_lifetime: bundle.refresh_lifetime(),
        });
    }

    /// Instant of the most recent install, if any.
    #[must_use]
    pub fn installed_at(&self) -> Option<DateTime<Utc>> {
        self.installed.map(|installed| installed.at)
    }

    /// Whether `kind` has outlived its declared lifetime as of `now`.
    ///
    /// The deadline instant itself is still fresh; only instants strictly
    /// past `installed_at + lifetime` count as expired.
    #[must_use]
    pub fn is_expired_at(&self, kind: TokenKind, now: DateTime<Utc>) -> bool {
        match self.installed {
            Some(installed) => {
                let lifetime = match kind {
                    TokenKind::Access => installed.access_lifetime,
                    TokenKind::Refresh => installed.refresh_lifetime,
                };
                // A deadline past the representable range never arrives
                installed
                    .at
                    .checked_add_signed(lifetime)
                    .is_some_and(|deadline| now > deadline)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestFixtures;

    #[test]
    fn test_never_installed_reports_both_expired() {
        let clock = RefreshClock::new();
        let now = TestFixtures::install_instant();

        assert!(clock.is_expired_at(TokenKind::Access, now));
        assert!(clock.is_expired_at(TokenKind::Refresh, now));
        assert!(clock.installed_at().is_none());
    }

    #[test]
    fn test_fresh_until_strictly_past_deadline() {
        let mut clock = RefreshClock::new();
        let t0 = TestFixtures::install_instant();
        clock.reset(&TestFixtures::bundle(), t0);

        // Bundle access lifetime is 300 seconds
        assert!(!clock.is_expired_at(TokenKind::Access, t0));
        assert!(!clock.is_expired_at(TokenKind::Access, t0 + Duration::seconds(299)));
        // The deadline itself is not expired
        assert!(!clock.is_expired_at(TokenKind::Access, t0 + Duration::seconds(300)));
        assert!(clock.is_expired_at(TokenKind::Access, t0 + Duration::seconds(301)));
    }

    #[test]
    fn test_kinds_expire_independently() {
        let mut clock = RefreshClock::new();
        let t0 = TestFixtures::install_instant();
        clock.reset(&TestFixtures::bundle(), t0);

        // Past the access lifetime (300s) but inside the refresh lifetime (1800s)
        let now = t0 + Duration::seconds(600);
        assert!(clock.is_expired_at(TokenKind::Access, now));
        assert!(!clock.is_expired_at(TokenKind::Refresh, now));

        // Past both lifetimes
        let later = t0 + Duration::seconds(1801);
        assert!(clock.is_expired_at(TokenKind::Access, later));
        assert!(clock.is_expired_at(TokenKind::Refresh, later));
    }

    #[test]
    fn test_reset_restores_freshness() {
        let mut clock = RefreshClock::new();
        let t0 = TestFixtures::install_instant();
        clock.reset(&TestFixtures::bundle(), t0);

        let expired_at = t0 + Duration::seconds(400);
        assert!(clock.is_expired_at(TokenKind::Access, expired_at));

        // Installing again at that instant makes both kinds fresh
        clock.reset(&TestFixtures::bundle(), expired_at);
        assert!(!clock.is_expired_at(TokenKind::Access, expired_at));
        assert!(!clock.is_expired_at(TokenKind::Refresh, expired_at));
        assert_eq!(clock.installed_at(), Some(expired_at));
    }

    #[test]
    fn test_reset_snapshots_new_lifetimes() {
        let mut clock = RefreshClock::new();
        let t0 = TestFixtures::install_instant();
        clock.reset(&TestFixtures::bundle(), t0);

        // A replacement bundle with a shorter access lifetime governs the
        // clock from its own install instant
        let short = crate::models::TokenBundle::new("at-2", "rt-2", 60, 1800);
        let t1 = t0 + Duration::seconds(100);
        clock.reset(&short, t1);

        assert!(!clock.is_expired_at(TokenKind::Access, t1 + Duration::seconds(60)));
        assert!(clock.is_expired_at(TokenKind::Access, t1 + Duration::seconds(61)));
    }
}
