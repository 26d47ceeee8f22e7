//! Registration jurisdictions and the secrecy-jurisdiction list.

use std::collections::BTreeSet;

/// Jurisdictions with low corporate-ownership transparency, flagged by default.
pub const DEFAULT_SECRECY_JURISDICTIONS: &[&str] = &["vg", "ky", "sc", "pa", "bz", "ws", "mh"];

const JURISDICTION_NAMES: &[(&str, &str)] = &[
    ("gb", "United Kingdom"),
    ("us_de", "Delaware"),
    ("us_ny", "New York"),
    ("us_ca", "California"),
    ("us_nv", "Nevada"),
    ("us_wy", "Wyoming"),
    ("vg", "British Virgin Islands"),
    ("ky", "Cayman Islands"),
    ("bm", "Bermuda"),
    ("pa", "Panama"),
    ("sc", "Seychelles"),
    ("mh", "Marshall Islands"),
    ("ws", "Samoa"),
    ("bz", "Belize"),
    ("nl", "Netherlands"),
    ("de", "Germany"),
    ("lu", "Luxembourg"),
    ("ie", "Ireland"),
    ("cy", "Cyprus"),
    ("mt", "Malta"),
    ("ch", "Switzerland"),
    ("li", "Liechtenstein"),
    ("ru", "Russia"),
    ("hk", "Hong Kong"),
    ("sg", "Singapore"),
    ("ae", "United Arab Emirates"),
];

/// Canonical form of a jurisdiction code: trimmed, ASCII lowercase.
#[must_use]
pub fn canonical_code(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

/// Human-readable name for a jurisdiction code, if known.
#[must_use]
pub fn jurisdiction_name(code: &str) -> Option<&'static str> {
    let code = canonical_code(code);
    JURISDICTION_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// The default secrecy list as an owned set.
#[must_use]
pub fn default_secrecy_jurisdictions() -> BTreeSet<String> {
    DEFAULT_SECRECY_JURISDICTIONS
        .iter()
        .map(|c| (*c).to_string())
        .collect()
}

/// Set of secrecy jurisdictions with case-insensitive membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecrecyList {
    codes: BTreeSet<String>,
}

impl SecrecyList {
    /// Builds a list from arbitrary codes; codes are canonicalized.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|c| canonical_code(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Returns true if `code` is a secrecy jurisdiction.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&canonical_code(code))
    }

    /// Iterates the canonical codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for SecrecyList {
    fn default() -> Self {
        Self::new(DEFAULT_SECRECY_JURISDICTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_lookup_is_case_insensitive() {
        assert_eq!(jurisdiction_name("VG"), Some("British Virgin Islands"));
        assert_eq!(jurisdiction_name(" us_de "), Some("Delaware"));
        assert_eq!(jurisdiction_name("zz"), None);
    }

    #[test]
    fn secrecy_list_membership() {
        let list = SecrecyList::default();
        assert_eq!(list.len(), 7);
        assert!(list.contains("vg"));
        assert!(list.contains("KY"));
        assert!(!list.contains("gb"));
    }

    #[test]
    fn secrecy_list_skips_blank_codes() {
        let list = SecrecyList::new(["", " PA ", "pa"]);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["pa"]);
    }
}
