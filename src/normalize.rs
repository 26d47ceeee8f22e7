//! Name canonicalization and transliteration.
//!
//! `normalize` produces the comparable form of an entity name: uppercase,
//! punctuation-free, legal-form suffixes removed, single-spaced. Names written
//! in Cyrillic are first passed through `transliterate` so that sanctioned
//! records can be compared with Latin-script registry records:
//!
//! ```
//! use sanctions_network::normalize::{normalize, transliterate};
//!
//! assert_eq!(normalize("Acme Holdings, Ltd."), "ACME HOLDINGS");
//! assert_eq!(normalize(&transliterate("ООО Газпром")), "GAZPROM");
//! ```

use std::sync::OnceLock;

use regex::Regex;

/// Legal-form tokens removed by [`normalize`].
///
/// Matched as whole tokens only: `SAAB` keeps its `SA`.
pub const LEGAL_SUFFIXES: &[&str] = &[
    "LLC",
    "LTD",
    "LIMITED",
    "INC",
    "CORP",
    "CORPORATION",
    "GMBH",
    "AG",
    "SA",
    "OOO",
    "ZAO",
    "OAO",
    "PAO",
];

fn non_name_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("static pattern compiles"))
}

fn is_legal_suffix(token: &str) -> bool {
    LEGAL_SUFFIXES.contains(&token)
}

/// Canonicalizes an entity name for comparison.
///
/// Never fails: empty input gives an empty string. The result contains only
/// letters, digits and single spaces, with no leading or trailing space, and
/// `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let upper = name.to_uppercase();
    let cleaned = non_name_chars().replace_all(&upper, " ");

    let mut out = String::with_capacity(cleaned.len());
    for token in cleaned.split_whitespace() {
        if is_legal_suffix(token) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

fn cyrillic_to_latin(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian and Belarusian letters.
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        'ў' => "u",
        _ => return None,
    };
    Some(latin)
}

/// Transliterates Cyrillic text to Latin script.
///
/// The input is lowercased first; characters outside the Cyrillic table pass
/// through unchanged. Soft and hard signs map to nothing.
#[must_use]
pub fn transliterate(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    for c in lower.chars() {
        match cyrillic_to_latin(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Returns the comparable forms of a name: the plain normalized form and,
/// when different, the normalized transliteration. Empty forms are skipped.
#[must_use]
pub fn query_forms(name: &str) -> Vec<String> {
    let mut forms = Vec::with_capacity(2);
    let plain = normalize(name);
    let translit = normalize(&transliterate(name));
    if !plain.is_empty() {
        forms.push(plain);
    }
    if !translit.is_empty() && !forms.contains(&translit) {
        forms.push(translit);
    }
    forms
}
