//! Exact matching on structured identifiers.
//!
//! This is the highest-trust path: every pair sharing a non-empty identifier
//! value becomes a record with confidence 100. It runs before fuzzy matching
//! so its records lead any confidence-ordered output.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::entity::{Entity, IdentifierKind};
use crate::matching::{MatchRecord, MatchType, EXACT_MATCH_CONFIDENCE};

/// Equality join of `sanctioned` and `registry` on one identifier kind.
///
/// Records without a value for `kind` on either side are skipped. Output order
/// follows `sanctioned`, then `registry` order.
#[must_use]
pub fn match_by_identifier(
    sanctioned: &[Entity],
    registry: &[Entity],
    kind: IdentifierKind,
) -> Vec<MatchRecord> {
    let mut by_value: HashMap<&str, Vec<&Entity>> = HashMap::new();
    for entity in registry {
        if let Some(value) = entity.identifier(kind) {
            by_value.entry(value).or_default().push(entity);
        }
    }

    if by_value.is_empty() {
        debug!(identifier = %kind, "no registry records carry this identifier");
        return Vec::new();
    }

    let mut matches = Vec::new();
    for entity in sanctioned {
        let Some(value) = entity.identifier(kind) else {
            continue;
        };
        let Some(targets) = by_value.get(value) else {
            continue;
        };
        for target in targets {
            matches.push(MatchRecord::new(
                entity,
                target,
                MatchType::Identifier,
                EXACT_MATCH_CONFIDENCE,
                value,
            ));
        }
    }

    info!(
        identifier = %kind,
        sanctioned = sanctioned.len(),
        registry = registry.len(),
        matches = matches.len(),
        "identifier matching complete"
    );
    matches
}

/// Runs [`match_by_identifier`] for each kind in order and concatenates.
#[must_use]
pub fn match_by_identifiers(
    sanctioned: &[Entity],
    registry: &[Entity],
    kinds: &[IdentifierKind],
) -> Vec<MatchRecord> {
    kinds
        .iter()
        .flat_map(|kind| match_by_identifier(sanctioned, registry, *kind))
        .collect()
}
