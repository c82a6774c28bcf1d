//! Test fixtures providing pre-built test objects
//!
//! Commonly used claims, bundles, and sessions shared by the unit tests,
//! so individual test modules do not recreate the same objects.

use chrono::{DateTime, Utc};

use crate::models::{IdentityClaims, RoleClaims, TokenBundle};
use crate::session::AuthenticationSession;

pub const TEST_USERNAME: &str = "jdoe";
pub const TEST_RESOURCE: &str = "ci-server";

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Claims with realm roles and one resource entry for
    /// [`TEST_RESOURCE`].
    #[must_use]
    pub fn claims() -> IdentityClaims {
        IdentityClaims {
            preferred_username: TEST_USERNAME.to_string(),
            realm_access: Some(RoleClaims {
                roles: vec!["admin".to_string(), "developer".to_string()],
            }),
            roles: None,
            resource_access: [(
                TEST_RESOURCE.to_string(),
                RoleClaims {
                    roles: vec!["viewer".to_string()],
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    /// A bundle with a 300 second access lifetime and an 1800 second
    /// refresh lifetime.
    #[must_use]
    pub fn bundle() -> TokenBundle {
        Self::bundle_with_tokens("test_access_token", "test_refresh_token")
    }

    /// Like [`TestFixtures::bundle`] with specific token strings.
    #[must_use]
    pub fn bundle_with_tokens(access: &str, refresh: &str) -> TokenBundle {
        TokenBundle::new(access, refresh, 300, 1800)
    }

    /// A fixed instant used as the deterministic install time.
    #[must_use]
    pub fn install_instant() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    /// A session built from [`TestFixtures::claims`] with
    /// [`TestFixtures::bundle`] installed at
    /// [`TestFixtures::install_instant`].
    #[must_use]
    pub fn session() -> AuthenticationSession {
        AuthenticationSession::new_at(
            &Self::claims(),
            Self::bundle(),
            TEST_RESOURCE,
            Self::install_instant(),
        )
    }
}
