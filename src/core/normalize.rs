//! Canonical names — the identity key shared by every strategy.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:the|a|an)\s+").expect("article pattern is valid"));

static TRAILING_POSSESSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"['’][sS]$").expect("possessive pattern is valid"));

/// Canonicalize a surface form: strip a leading article, capitalize the
/// first letter and lower-case the rest, then drop a trailing possessive.
///
/// The steps are repeated until the result stops changing, which makes the
/// function idempotent: `canonicalize(&canonicalize(x)) == canonicalize(x)`.
pub fn canonicalize(surface: &str) -> String {
    // Later rounds only strip an article or a possessive, or settle the
    // case of characters the first round expanded, so the loop ends.
    let mut current = surface.trim().to_string();
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(name: &str) -> String {
    let stripped = LEADING_ARTICLE.replace(name, "");
    let cased = capitalize_first(&stripped);
    let without_possessive = TRAILING_POSSESSIVE.replace(&cased, "");
    without_possessive.trim().to_string()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lower-cased key used to compare a token against lexicon word sets.
pub fn word_key(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
        .to_lowercase()
}
