//! Claim admissibility and rank selection
//!
//! Two independent filters compose: a property group is dropped when its
//! id is banned or its datatype is in the configured deny set, and within
//! a surviving group the preferred-rank claims displace the rest when any
//! exist. Deprecated-rank claims are deliberately not excluded on their
//! own: when a group has no preferred claims the whole group survives,
//! deprecated members included.

use crate::model::{Claim, ClaimMap, Rank};
use std::collections::HashSet;

/// Whether a property group passes the datatype and ledger filters.
///
/// The datatype is read from the first claim; the data-model invariant
/// guarantees it is uniform across the group. An empty group is never
/// admissible.
pub fn admissible(
    property: &str,
    claims: &[Claim],
    banned_properties: &HashSet<String>,
    banned_datatypes: &[String],
) -> bool {
    let Some(first) = claims.first() else {
        return false;
    };
    !banned_properties.contains(property)
        && !banned_datatypes
            .iter()
            .any(|d| d == &first.mainsnak.datatype)
}

/// Pick the authoritative claims of a group: the preferred subset when
/// one exists, otherwise the group unchanged.
pub fn select_ranked(claims: &[Claim]) -> Vec<Claim> {
    let preferred: Vec<Claim> = claims
        .iter()
        .filter(|c| c.rank == Rank::Preferred)
        .cloned()
        .collect();
    if preferred.is_empty() {
        claims.to_vec()
    } else {
        preferred
    }
}

/// Apply both filters to a claims map, preserving property order and
/// the relative order of claims within each group.
pub fn filter_claims(
    claims: &ClaimMap,
    banned_properties: &HashSet<String>,
    banned_datatypes: &[String],
) -> ClaimMap {
    claims
        .iter()
        .filter(|(property, group)| {
            admissible(property, group, banned_properties, banned_datatypes)
        })
        .map(|(property, group)| (property.clone(), select_ranked(group)))
        .collect()
}
