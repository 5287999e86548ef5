//! Lexicon — the word lists every detection strategy matches against.
//!
//! The lexicon is plain configuration data. A built-in table ships with the
//! crate (`data/lexicon.ron`); callers can merge their own RON files on top.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("lexicon list '{0}' is empty")]
    EmptyList(&'static str),
}

static BUILTIN_SOURCE: &str = include_str!("../../data/lexicon.ron");

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::parse_ron(BUILTIN_SOURCE).expect("built-in lexicon must be valid RON")
});

/// Word lists used by the detectors. Missing lists in a RON file default
/// to empty, so partial files can be merged onto the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub stopwords: Vec<String>,
    pub pronouns: Vec<String>,
    pub plural_pronouns: Vec<String>,
    pub formation_pronouns: Vec<String>,
    pub titles: Vec<String>,
    pub occupations: Vec<String>,
    pub relationship_terms: Vec<String>,
    pub role_determiners: Vec<String>,
    pub animal_terms: Vec<String>,
    pub description_nouns: Vec<String>,
    pub collective_terms: Vec<String>,
    pub collective_determiners: Vec<String>,
    pub collective_action_indicators: Vec<String>,
    pub formation_verbs: Vec<String>,
    pub formation_nouns: Vec<String>,
    pub speech_verbs: Vec<String>,
    pub action_verbs: Vec<String>,
    pub emotion_verbs: Vec<String>,
    pub mental_verbs: Vec<String>,
    pub physical_attributes: Vec<String>,
    pub personality_traits: Vec<String>,
}

impl Lexicon {
    /// The table embedded in the crate.
    pub fn builtin() -> Lexicon {
        BUILTIN.clone()
    }

    /// Load a lexicon from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Lexicon, LexiconError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a lexicon from a RON string.
    pub fn parse_ron(input: &str) -> Result<Lexicon, LexiconError> {
        let mut lexicon: Lexicon = ron::from_str(input)?;
        lexicon.normalize();
        Ok(lexicon)
    }

    /// Merge another lexicon into this one. Lists are extended; entries
    /// already present are skipped.
    pub fn merge(&mut self, other: Lexicon) {
        let Lexicon {
            stopwords,
            pronouns,
            plural_pronouns,
            formation_pronouns,
            titles,
            occupations,
            relationship_terms,
            role_determiners,
            animal_terms,
            description_nouns,
            collective_terms,
            collective_determiners,
            collective_action_indicators,
            formation_verbs,
            formation_nouns,
            speech_verbs,
            action_verbs,
            emotion_verbs,
            mental_verbs,
            physical_attributes,
            personality_traits,
        } = other;

        extend_unique(&mut self.stopwords, stopwords);
        extend_unique(&mut self.pronouns, pronouns);
        extend_unique(&mut self.plural_pronouns, plural_pronouns);
        extend_unique(&mut self.formation_pronouns, formation_pronouns);
        extend_unique(&mut self.titles, titles);
        extend_unique(&mut self.occupations, occupations);
        extend_unique(&mut self.relationship_terms, relationship_terms);
        extend_unique(&mut self.role_determiners, role_determiners);
        extend_unique(&mut self.animal_terms, animal_terms);
        extend_unique(&mut self.description_nouns, description_nouns);
        extend_unique(&mut self.collective_terms, collective_terms);
        extend_unique(&mut self.collective_determiners, collective_determiners);
        extend_unique(
            &mut self.collective_action_indicators,
            collective_action_indicators,
        );
        extend_unique(&mut self.formation_verbs, formation_verbs);
        extend_unique(&mut self.formation_nouns, formation_nouns);
        extend_unique(&mut self.speech_verbs, speech_verbs);
        extend_unique(&mut self.action_verbs, action_verbs);
        extend_unique(&mut self.emotion_verbs, emotion_verbs);
        extend_unique(&mut self.mental_verbs, mental_verbs);
        extend_unique(&mut self.physical_attributes, physical_attributes);
        extend_unique(&mut self.personality_traits, personality_traits);
    }

    /// Every list with its field name, in declaration order.
    pub fn lists(&self) -> Vec<(&'static str, &[String])> {
        vec![
            ("stopwords", self.stopwords.as_slice()),
            ("pronouns", self.pronouns.as_slice()),
            ("plural_pronouns", self.plural_pronouns.as_slice()),
            ("formation_pronouns", self.formation_pronouns.as_slice()),
            ("titles", self.titles.as_slice()),
            ("occupations", self.occupations.as_slice()),
            ("relationship_terms", self.relationship_terms.as_slice()),
            ("role_determiners", self.role_determiners.as_slice()),
            ("animal_terms", self.animal_terms.as_slice()),
            ("description_nouns", self.description_nouns.as_slice()),
            ("collective_terms", self.collective_terms.as_slice()),
            ("collective_determiners", self.collective_determiners.as_slice()),
            (
                "collective_action_indicators",
                self.collective_action_indicators.as_slice(),
            ),
            ("formation_verbs", self.formation_verbs.as_slice()),
            ("formation_nouns", self.formation_nouns.as_slice()),
            ("speech_verbs", self.speech_verbs.as_slice()),
            ("action_verbs", self.action_verbs.as_slice()),
            ("emotion_verbs", self.emotion_verbs.as_slice()),
            ("mental_verbs", self.mental_verbs.as_slice()),
            ("physical_attributes", self.physical_attributes.as_slice()),
            ("personality_traits", self.personality_traits.as_slice()),
        ]
    }

    /// Fail on the first empty list. Detection tolerates empty lists (the
    /// matching strategy becomes a no-op); the linter uses this to flag them.
    pub fn validate(&self) -> Result<(), LexiconError> {
        for (name, list) in self.lists() {
            if list.is_empty() {
                return Err(LexiconError::EmptyList(name));
            }
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let lists: [&mut Vec<String>; 21] = [
            &mut self.stopwords,
            &mut self.pronouns,
            &mut self.plural_pronouns,
            &mut self.formation_pronouns,
            &mut self.titles,
            &mut self.occupations,
            &mut self.relationship_terms,
            &mut self.role_determiners,
            &mut self.animal_terms,
            &mut self.description_nouns,
            &mut self.collective_terms,
            &mut self.collective_determiners,
            &mut self.collective_action_indicators,
            &mut self.formation_verbs,
            &mut self.formation_nouns,
            &mut self.speech_verbs,
            &mut self.action_verbs,
            &mut self.emotion_verbs,
            &mut self.mental_verbs,
            &mut self.physical_attributes,
            &mut self.personality_traits,
        ];
        for list in lists {
            let raw = std::mem::take(list);
            extend_unique(
                list,
                raw.into_iter()
                    .map(|w| w.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()),
            );
        }
    }
}

fn extend_unique(target: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !item.is_empty() && !target.contains(&item) {
            target.push(item);
        }
    }
}
