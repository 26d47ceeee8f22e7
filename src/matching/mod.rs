//! Record matching between sanctioned entities and registry entities.
//!
//! Two independent strategies produce [`MatchRecord`]s:
//! - [`identifier`]: exact joins on structured identifiers (confidence 100)
//! - [`fuzzy`]: token-set similarity over normalized and transliterated names
//!
//! [`prioritize`] merges their output into the analyst-facing list. Records
//! are never deduplicated here; several records for one pair are independent
//! signals.

pub mod fuzzy;
pub mod identifier;
pub mod prioritize;
pub mod similarity;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{corporate_key, Entity, IdentifierKind};

pub use fuzzy::{fuzzy_match, FuzzyMatcher, RegistryIndex, MAX_CANDIDATES_PER_QUERY};
pub use identifier::{match_by_identifier, match_by_identifiers};
pub use prioritize::high_risk_matches;
pub use similarity::token_set_ratio;

/// Confidence assigned to exact identifier matches.
pub const EXACT_MATCH_CONFIDENCE: f64 = 100.0;

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Shared structured identifier.
    Identifier,
    /// Approximate name similarity.
    FuzzyName,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::FuzzyName => write!(f, "fuzzy_name"),
        }
    }
}

/// One candidate link between a sanctioned entity and a registry entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Sanctioned-side entity.
    pub source_entity_id: String,
    /// Registry-side entity.
    pub target_entity_id: String,
    /// Strategy that produced the record.
    pub match_type: MatchType,
    /// Score in [0, 100].
    pub confidence_score: f64,
    /// The identifier value, or `"<query> -> <candidate>"` for name matches.
    pub match_key: String,
    /// Caption of the registry-side entity.
    #[serde(default)]
    pub target_name: String,
    /// Registration jurisdiction of the registry-side entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_jurisdiction: Option<String>,
    /// Registration number of the registry-side entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_registration_number: Option<String>,
}

impl MatchRecord {
    /// Builds a record, snapshotting the registry-side attributes.
    #[must_use]
    pub fn new(
        sanctioned: &Entity,
        registry: &Entity,
        match_type: MatchType,
        confidence_score: f64,
        match_key: impl Into<String>,
    ) -> Self {
        Self {
            source_entity_id: sanctioned.entity_id.clone(),
            target_entity_id: registry.entity_id.clone(),
            match_type,
            confidence_score,
            match_key: match_key.into(),
            target_name: registry.caption().to_string(),
            target_jurisdiction: registry.jurisdiction_code().map(str::to_string),
            target_registration_number: registry
                .identifier(IdentifierKind::RegistrationNumber)
                .map(str::to_string),
        }
    }

    /// Node key for the registry-side party in the identity graph.
    ///
    /// `"{jurisdiction}_{registration_number}"` when both are known, otherwise
    /// the registry entity id.
    #[must_use]
    pub fn corporate_node_id(&self) -> String {
        corporate_key(
            self.target_jurisdiction.as_deref(),
            self.target_registration_number.as_deref(),
        )
        .unwrap_or_else(|| self.target_entity_id.clone())
    }
}
