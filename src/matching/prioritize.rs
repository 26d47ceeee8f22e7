//! Ranking of combined match output for analyst review.

use tracing::debug;

use crate::error::ValidationError;
use crate::jurisdiction::SecrecyList;
use crate::matching::MatchRecord;

fn is_secrecy_target(record: &MatchRecord, secrecy: &SecrecyList) -> bool {
    record
        .target_jurisdiction
        .as_deref()
        .is_some_and(|j| secrecy.contains(j))
}

/// Keeps high-confidence matches and every match into a secrecy jurisdiction.
///
/// A record is retained when `confidence_score >= confidence_threshold` or its
/// registry-side jurisdiction is in `secrecy`. The result is sorted by
/// confidence descending; equal scores keep their input order, so identifier
/// matches passed first stay ahead of equally scored fuzzy matches.
pub fn high_risk_matches(
    matches: &[MatchRecord],
    confidence_threshold: u32,
    secrecy: &SecrecyList,
) -> Result<Vec<MatchRecord>, ValidationError> {
    ValidationError::check_threshold(
        "high_risk_confidence_threshold",
        i64::from(confidence_threshold),
    )?;
    let threshold = f64::from(confidence_threshold);

    let mut retained: Vec<MatchRecord> = matches
        .iter()
        .filter(|m| m.confidence_score >= threshold || is_secrecy_target(m, secrecy))
        .cloned()
        .collect();
    // `sort_by` is stable.
    retained.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));

    debug!(
        input = matches.len(),
        retained = retained.len(),
        threshold = confidence_threshold,
        "prioritized matches"
    );
    Ok(retained)
}
