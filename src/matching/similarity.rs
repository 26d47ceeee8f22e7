//! Token-set similarity.
//!
//! Both names are split into sorted, de-duplicated token sets. When one set
//! contains the other the score is 100; otherwise the score is the best
//! normalized Levenshtein similarity between the shared tokens and each side's
//! full token list. The result is invariant to word order.

use std::cmp::Ordering;

/// Sorted, de-duplicated whitespace tokens of a name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    /// Tokenizes a (normalized) name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut tokens: Vec<String> = name.split_whitespace().map(str::to_string).collect();
        tokens.sort_unstable();
        tokens.dedup();
        Self { tokens }
    }

    /// Returns true if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The sorted tokens.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

struct Split<'a> {
    common: Vec<&'a str>,
    only_a: Vec<&'a str>,
    only_b: Vec<&'a str>,
}

fn split_sorted<'a>(a: &'a [String], b: &'a [String]) -> Split<'a> {
    let mut split = Split {
        common: Vec::new(),
        only_a: Vec::new(),
        only_b: Vec::new(),
    };
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                split.only_a.push(&a[i]);
                i += 1;
            }
            Ordering::Greater => {
                split.only_b.push(&b[j]);
                j += 1;
            }
            Ordering::Equal => {
                split.common.push(&a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    split.only_a.extend(a[i..].iter().map(String::as_str));
    split.only_b.extend(b[j..].iter().map(String::as_str));
    split
}

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn joined(common: &str, rest: &[&str]) -> String {
    let rest = rest.join(" ");
    match (common.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => common.to_string(),
        (false, false) => format!("{common} {rest}"),
    }
}

/// Token-set similarity of two pre-tokenized names, in [0, 100].
#[must_use]
pub fn token_set_score(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let split = split_sorted(&a.tokens, &b.tokens);
    if !split.common.is_empty() && (split.only_a.is_empty() || split.only_b.is_empty()) {
        return 100.0;
    }

    let common = split.common.join(" ");
    let full_a = joined(&common, &split.only_a);
    let full_b = joined(&common, &split.only_b);

    let mut best = ratio(&full_a, &full_b);
    if !common.is_empty() {
        best = best.max(ratio(&common, &full_a)).max(ratio(&common, &full_b));
    }
    best
}

/// Token-set similarity of two names, in [0, 100].
///
/// ```
/// use sanctions_network::matching::token_set_ratio;
///
/// assert_eq!(token_set_ratio("ACME", "ACME INTERNATIONAL"), 100.0);
/// assert_eq!(token_set_ratio("TRADING ACME", "ACME TRADING"), 100.0);
/// assert!(token_set_ratio("ZZYZX UNRELATED", "GAZPROM") < 50.0);
/// ```
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_score(&TokenSet::new(a), &TokenSet::new(b))
}
