//! The built-in detection strategies, grouped by what they look at.

pub mod collective;
pub mod contextual;
pub mod surface;

use std::ops::Range;

use crate::core::patterns::{CompiledLexicon, NAME_TOKEN};
use crate::core::strategy::Strategy;

pub use collective::{
    ActingTogether, CollectiveActions, CollectiveReferences, EnumeratedCharacters,
    IdentityFormation, PluralPronouns,
};
pub use contextual::{ActionSubjects, DialogueAttribution, OccupationRoles};
pub use surface::{AnimalCharacters, AnimalReferences, CharacterDescriptions, ProperNames, TitledNames};

/// Bytes searched on each side of a collective-action indicator.
pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

/// The fourteen built-in strategies in their merge order.
pub fn default_strategies(context_window: usize) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(ProperNames),
        Box::new(TitledNames),
        Box::new(AnimalCharacters),
        Box::new(AnimalReferences),
        Box::new(CharacterDescriptions),
        Box::new(DialogueAttribution),
        Box::new(ActionSubjects),
        Box::new(OccupationRoles),
        Box::new(CollectiveReferences),
        Box::new(ActingTogether),
        Box::new(EnumeratedCharacters),
        Box::new(PluralPronouns),
        Box::new(CollectiveActions { context_window }),
        Box::new(IdentityFormation { context_window }),
    ]
}

/// Collapse internal whitespace runs to single spaces.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capitalized non-stopword tokens lying wholly inside `range`, first
/// occurrence only, in text order.
pub(crate) fn names_in(text: &str, range: Range<usize>, lexicon: &CompiledLexicon) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for m in NAME_TOKEN.find_iter(text) {
        if m.start() < range.start {
            continue;
        }
        if m.end() > range.end {
            break;
        }
        let name = m.as_str();
        if !lexicon.is_stopword(name) && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Byte range of `radius` bytes on each side of `at`, clamped to `text`.
pub(crate) fn window(text: &str, at: usize, radius: usize) -> Range<usize> {
    at.saturating_sub(radius)..at.saturating_add(radius).min(text.len())
}

/// Offset of the next char boundary after `at`.
pub(crate) fn next_boundary(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}
