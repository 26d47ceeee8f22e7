//! Tunables for matching and analytics.
//!
//! Configuration is a plain struct with defaults. It can be deserialized from
//! JSON (missing fields take their defaults) and overridden from `SNM_*`
//! environment variables. Out-of-range values are rejected by
//! [`ResolutionConfig::validate`], never clamped.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::IdentifierKind;
use crate::error::{SanctionsResult, ValidationError};
use crate::jurisdiction::{default_secrecy_jurisdictions, SecrecyList};

/// Largest accepted `max_path_depth`.
pub const MAX_PATH_DEPTH_LIMIT: usize = 10;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "SNM_";

const THRESHOLD_FIELDS: [&str; 3] = [
    "name_match_threshold",
    "address_match_threshold",
    "high_risk_confidence_threshold",
];

/// Resolution and analytics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Minimum token-set similarity (0-100) for a fuzzy name match.
    pub name_match_threshold: u32,
    /// Reserved for address matching; no algorithm reads it yet.
    pub address_match_threshold: u32,
    /// Confidence at or above which a match is always high risk.
    pub high_risk_confidence_threshold: u32,
    /// Jurisdictions whose matches are kept regardless of confidence.
    pub secrecy_jurisdictions: BTreeSet<String>,
    /// Maximum number of edges in an enumerated sanctions path.
    pub max_path_depth: usize,
    /// Identifier kinds joined by the exact matcher, in order.
    pub identifier_kinds: Vec<IdentifierKind>,
    /// Worker threads for fuzzy matching. 1 runs inline.
    pub fuzzy_workers: usize,
    /// Seed for the community detection node ordering.
    pub community_seed: u64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            name_match_threshold: 85,
            address_match_threshold: 80,
            high_risk_confidence_threshold: 90,
            secrecy_jurisdictions: default_secrecy_jurisdictions(),
            max_path_depth: 4,
            identifier_kinds: vec![
                IdentifierKind::TaxId,
                IdentifierKind::Ogrn,
                IdentifierKind::Lei,
                IdentifierKind::RegistrationNumber,
            ],
            fuzzy_workers: 1,
            community_seed: 42,
        }
    }
}

fn env_var(suffix: &str) -> Option<(String, String)> {
    let name = format!("{ENV_PREFIX}{suffix}");
    std::env::var(&name).ok().map(|value| (name, value))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ValidationError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ValidationError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn env_threshold(suffix: &str, field: &str) -> Result<Option<u32>, ValidationError> {
    match env_var(suffix) {
        None => Ok(None),
        Some((name, value)) => {
            let raw: i64 = parse_env(&name, &value)?;
            ValidationError::check_threshold(field, raw).map(Some)
        }
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl ResolutionConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    ///
    /// Integer thresholds are range-checked before typed decoding, so a
    /// negative or oversized threshold is a [`ValidationError`] rather than a
    /// parse error. The result is validated before it is returned.
    pub fn from_json_str(json: &str) -> SanctionsResult<Self> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        for field in THRESHOLD_FIELDS {
            if let Some(value) = document.get(field).and_then(serde_json::Value::as_i64) {
                ValidationError::check_threshold(field, value)?;
            }
        }
        let config: Self = serde_json::from_value(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SanctionsResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Defaults overridden by `SNM_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Applies `SNM_*` environment overrides, then validates.
    ///
    /// On error `self` is left untouched.
    pub fn apply_env(&mut self) -> Result<(), ValidationError> {
        let mut next = self.clone();
        next.read_env()?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn read_env(&mut self) -> Result<(), ValidationError> {
        if let Some(v) = env_threshold("NAME_MATCH_THRESHOLD", "name_match_threshold")? {
            self.name_match_threshold = v;
        }
        if let Some(v) = env_threshold("ADDRESS_MATCH_THRESHOLD", "address_match_threshold")? {
            self.address_match_threshold = v;
        }
        if let Some(v) = env_threshold(
            "HIGH_RISK_CONFIDENCE_THRESHOLD",
            "high_risk_confidence_threshold",
        )? {
            self.high_risk_confidence_threshold = v;
        }
        if let Some((_, value)) = env_var("SECRECY_JURISDICTIONS") {
            self.secrecy_jurisdictions = split_list(&value)
                .map(crate::jurisdiction::canonical_code)
                .collect();
        }
        if let Some((name, value)) = env_var("MAX_PATH_DEPTH") {
            self.max_path_depth = parse_env(&name, &value)?;
        }
        if let Some((_, value)) = env_var("IDENTIFIER_KINDS") {
            self.identifier_kinds = split_list(&value)
                .map(str::parse::<IdentifierKind>)
                .collect::<Result<_, _>>()?;
        }
        if let Some((name, value)) = env_var("FUZZY_WORKERS") {
            self.fuzzy_workers = parse_env(&name, &value)?;
        }
        if let Some((name, value)) = env_var("COMMUNITY_SEED") {
            self.community_seed = parse_env(&name, &value)?;
        }
        Ok(())
    }

    /// Checks every tunable against its allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let values = [
            self.name_match_threshold,
            self.address_match_threshold,
            self.high_risk_confidence_threshold,
        ];
        for (name, value) in THRESHOLD_FIELDS.into_iter().zip(values) {
            ValidationError::check_threshold(name, i64::from(value))?;
        }

        if self.max_path_depth == 0 || self.max_path_depth > MAX_PATH_DEPTH_LIMIT {
            return Err(ValidationError::InvalidField {
                field: "max_path_depth".to_string(),
                reason: format!(
                    "{} is outside 1..={MAX_PATH_DEPTH_LIMIT}",
                    self.max_path_depth
                ),
            });
        }

        if self.fuzzy_workers == 0 {
            return Err(ValidationError::InvalidField {
                field: "fuzzy_workers".to_string(),
                reason: "at least one worker is required".to_string(),
            });
        }

        Ok(())
    }

    /// Secrecy jurisdictions as a lookup list.
    #[must_use]
    pub fn secrecy_list(&self) -> SecrecyList {
        SecrecyList::new(&self.secrecy_jurisdictions)
    }
}
