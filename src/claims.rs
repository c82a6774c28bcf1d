//! Authority aggregation from provider claims
//!
//! Turns an [`IdentityClaims`] payload into the ordered authority list
//! consumed by authorization checks. The order is a contract: realm
//! roles, then the generic roles claim, then resource roles, with the
//! authenticated sentinel always last. Duplicates across sources are
//! preserved.

use log::debug;

use crate::models::IdentityClaims;

/// Sentinel authority present on every authenticated session, independent
/// of any provider-asserted role.
pub const AUTHENTICATED_AUTHORITY: &str = "authenticated";

/// Build the ordered authority list for `claims`, scoped to `resource_id`.
///
/// Absent claim sources are skipped, and a `resource_id` with no entry in
/// the per-resource map contributes nothing. No deduplication is
/// performed: a role asserted by two sources yields two entries, in
/// source order.
#[must_use]
pub fn build_authorities(claims: &IdentityClaims, resource_id: &str) -> Vec<String> {
    let mut authorities = Vec::new();

    if let Some(realm) = &claims.realm_access {
        authorities.extend(realm.roles.iter().cloned());
    }

    if let Some(roles) = &claims.roles {
        authorities.extend(roles.iter().cloned());
    }

    if let Some(resource) = claims.resource_access.get(resource_id) {
        authorities.extend(resource.roles.iter().cloned());
    }

    authorities.push(AUTHENTICATED_AUTHORITY.to_string());

    debug!(
        "Aggregated {} authorities for resource {resource_id}",
        authorities.len()
    );

    authorities
}
