#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the grantrs library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod claims;
pub mod models;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

/// Re-export commonly used items
pub use claims::{build_authorities, AUTHENTICATED_AUTHORITY};
pub use models::{ClaimsError, IdentityClaims, RoleClaims, TokenBundle};
pub use session::{AuthenticationSession, RefreshClock, TokenKind};
