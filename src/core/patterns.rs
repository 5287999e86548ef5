//! Compiled pattern registry — lexicon word lists turned into regexes and
//! lookup sets, built once per detector and shared by every strategy.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;

use crate::core::lexicon::{Lexicon, LexiconError};
use crate::core::normalize::word_key;

/// Compiled size limit for lexicon-built patterns.
const PATTERN_SIZE_LIMIT: usize = 8 * (1 << 20);

/// A capitalized word: the unit every name heuristic works with.
pub static NAME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("name token pattern is valid"));

/// Runs of capitalized words on one line.
pub static PROPER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*\b").expect("proper name pattern is valid")
});

/// `Name and Name (and Name)*`.
pub static CONJUNCTION_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+and\s+[A-Z][a-z]+)+\b")
        .expect("conjunction chain pattern is valid")
});

/// `Name, Name(, Name)*(,) and Name`.
pub static ENUMERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+,\s+[A-Z][a-z]+(?:,\s+[A-Z][a-z]+)*,?\s+and\s+[A-Z][a-z]+\b")
        .expect("enumeration pattern is valid")
});

/// Three or more names joined only by "and": `Tom and Jerry and Spike`.
pub static AND_ENUMERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+and\s+[A-Z][a-z]+){2,}\b")
        .expect("and-only enumeration pattern is valid")
});

/// Whitespace-delimited tokens, with offsets.
pub static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("word pattern is valid"));

/// Sentence terminators followed by whitespace.
pub static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("sentence break pattern is valid"));

/// Quote styles recognised by dialogue attribution: (open, close).
const QUOTE_STYLES: &[(&str, &str)] = &[("\"", "\""), ("“", "”"), ("—", "—"), ("'", "'")];

/// Dialogue followed by its attribution. Named groups:
/// `v1 n1` for `"…", said Tom`, `n2 v2` for `"…" Tom said`,
/// `v3 n3` for `"…", said the guard`.
pub static DIALOGUE_AFTER_QUOTE: Lazy<Vec<Regex>> = Lazy::new(|| {
    QUOTE_STYLES
        .iter()
        .map(|(open, close)| {
            let pattern = format!(
                r"{open}([^{close}]+){close}\s*(?:,?\s*(?P<v1>[a-z]+)\s+(?P<n1>[A-Z][a-z]+)|(?P<n2>[A-Z][a-z]+)\s+(?P<v2>[a-z]+)|,?\s*(?P<v3>[a-z]+)\s+(?P<n3>the\s+[a-z]+))",
                open = regex::escape(open),
                close = regex::escape(close),
            );
            Regex::new(&pattern).expect("dialogue pattern is valid")
        })
        .collect()
});

/// Lexicon terms and regexes used by the strategies.
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    pub lexicon: Lexicon,
    pub stopwords: FxHashSet<String>,
    pub pronouns: FxHashSet<String>,
    pub speech_verbs: FxHashSet<String>,
    /// Action, emotion and mental verbs together.
    pub subject_verbs: FxHashSet<String>,
    /// Occupations and relationship terms together.
    pub role_terms: FxHashSet<String>,
    pub role_determiners: FxHashSet<String>,
    pub animal_terms: FxHashSet<String>,
    pub formation_pronouns: FxHashSet<String>,
    pub physical_attributes: FxHashSet<String>,
    pub personality_traits: FxHashSet<String>,

    /// `Mr. Smith`, `old Tom`.
    pub titled_name: Option<Regex>,
    /// `Tom said, "…"`, `Mr. Smith said, "…"`. Groups `name`, `verb`.
    pub dialogue_before_quote: Regex,
    /// `the|a|an <word> (named <Name>)?`. Groups `kind`, `name`.
    pub animal_name: Regex,
    /// `the <animal>`. Group `animal`.
    pub the_animal: Option<Regex>,
    /// `the <modifiers> <noun>`. Groups `modifiers`, `noun`.
    pub character_description: Option<Regex>,
    /// `the <occupation> named|called <Name>`. Group `name`.
    pub named_occupation: Option<Regex>,
    /// Determiner + collective noun. Groups `det`, `noun`.
    pub collective_reference: Option<Regex>,
    pub plural_pronoun: Option<Regex>,
    pub collective_action_indicator: Option<Regex>,
    /// `formed a team`. Group `noun`.
    pub identity_formation: Option<Regex>,
}

impl CompiledLexicon {
    /// Compile a lexicon. Empty lists disable the patterns built from them.
    pub fn compile(lexicon: Lexicon) -> Result<CompiledLexicon, LexiconError> {
        let titles = alternation(&lexicon.titles);
        let animals = alternation(&lexicon.animal_terms);
        let description_nouns = alternation(&lexicon.description_nouns);
        let occupations = alternation(&lexicon.occupations);
        let collective_terms = alternation(&lexicon.collective_terms);
        let collective_determiners = alternation(&lexicon.collective_determiners);
        let plural_pronouns = alternation(&lexicon.plural_pronouns);
        let indicators = alternation(&lexicon.collective_action_indicators);
        let formation_verbs = alternation(&lexicon.formation_verbs);
        let formation_nouns = alternation(&lexicon.formation_nouns);

        let titled_name = titles
            .as_ref()
            .map(|t| build(&format!(r"\b(?i:{t})\.?\s+[A-Z][a-z]+\b")))
            .transpose()?;

        let title_prefix = titles
            .as_ref()
            .map(|t| format!(r"(?:\b(?i:{t})\.?\s+)?"))
            .unwrap_or_default();
        let dialogue_before_quote = build(&format!(
            r#"(?P<name>{title_prefix}\b[A-Z][a-z]+)\s+(?P<verb>[a-z]+)\s*[,:]?\s*["“'—]"#
        ))?;

        let animal_name = build(
            r"\b(?i:the|a|an)\s+(?P<kind>[A-Za-z]+)(?:\s+(?i:named|called)\s+(?P<name>[A-Z][a-z]+))?",
        )?;

        let the_animal = animals
            .as_ref()
            .map(|a| build(&format!(r"(?i)\bthe\s+(?P<animal>{a})\b")))
            .transpose()?;

        let character_description = description_nouns
            .as_ref()
            .map(|n| {
                build(&format!(
                    r"(?i)\b(?:the|a|an)\s+(?P<modifiers>(?:[a-z][a-z-]*\s+){{1,3}}?)(?P<noun>{n})\b"
                ))
            })
            .transpose()?;

        let named_occupation = occupations
            .as_ref()
            .map(|o| {
                build(&format!(
                    r"\b(?i:the)\s+(?i:{o})\s+(?i:named|called)\s+(?P<name>[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\b"
                ))
            })
            .transpose()?;

        let collective_reference = match (&collective_determiners, &collective_terms) {
            (Some(d), Some(c)) => Some(build(&format!(
                r"(?i)\b(?P<det>{d})\s+(?P<noun>{c})\b"
            ))?),
            _ => None,
        };

        let plural_pronoun = plural_pronouns
            .as_ref()
            .map(|p| build(&format!(r"(?i)\b(?:{p})\b")))
            .transpose()?;

        let collective_action_indicator = indicators
            .as_ref()
            .map(|i| build(&format!(r"(?i)\b(?:{i})\b")))
            .transpose()?;

        let identity_formation = match (&formation_verbs, &formation_nouns) {
            (Some(v), Some(n)) => Some(build(&format!(
                r"(?i)\b(?:{v})\s+(?:a|the|their\s+own|their)\s+(?P<noun>{n})\b"
            ))?),
            _ => None,
        };

        let mut subject_verbs = word_set(&lexicon.action_verbs);
        subject_verbs.extend(word_set(&lexicon.emotion_verbs));
        subject_verbs.extend(word_set(&lexicon.mental_verbs));

        let mut role_terms = word_set(&lexicon.occupations);
        role_terms.extend(word_set(&lexicon.relationship_terms));

        Ok(CompiledLexicon {
            stopwords: word_set(&lexicon.stopwords),
            pronouns: word_set(&lexicon.pronouns),
            speech_verbs: word_set(&lexicon.speech_verbs),
            subject_verbs,
            role_terms,
            role_determiners: word_set(&lexicon.role_determiners),
            animal_terms: word_set(&lexicon.animal_terms),
            formation_pronouns: word_set(&lexicon.formation_pronouns),
            physical_attributes: word_set(&lexicon.physical_attributes),
            personality_traits: word_set(&lexicon.personality_traits),
            titled_name,
            dialogue_before_quote,
            animal_name,
            the_animal,
            character_description,
            named_occupation,
            collective_reference,
            plural_pronoun,
            collective_action_indicator,
            identity_formation,
            lexicon,
        })
    }

    /// The built-in lexicon, compiled.
    pub fn builtin() -> Result<CompiledLexicon, LexiconError> {
        Self::compile(Lexicon::builtin())
    }

    /// Stoplist check for a single capitalized token.
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(&word_key(token))
    }

    pub fn is_pronoun(&self, token: &str) -> bool {
        self.pronouns.contains(&word_key(token))
    }

    /// True when `name` contains an animal term as a whole word.
    pub fn mentions_animal(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        self.animal_terms.iter().any(|term| {
            let parts: Vec<&str> = term.split_whitespace().collect();
            !parts.is_empty() && words.windows(parts.len()).any(|w| w == parts.as_slice())
        })
    }
}

/// Regex alternation of escaped terms, longest first so multi-word
/// phrases win over their prefixes. `None` for an empty list.
fn alternation(terms: &[String]) -> Option<String> {
    let mut escaped: Vec<String> = terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    if escaped.is_empty() {
        return None;
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    Some(escaped.join("|"))
}

fn build(pattern: &str) -> Result<Regex, LexiconError> {
    Ok(RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?)
}

fn word_set(words: &[String]) -> FxHashSet<String> {
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled() -> CompiledLexicon {
        CompiledLexicon::builtin().unwrap()
    }

    #[test]
    fn builtin_compiles_every_pattern() {
        let c = compiled();
        assert!(c.titled_name.is_some());
        assert!(c.the_animal.is_some());
        assert!(c.character_description.is_some());
        assert!(c.collective_reference.is_some());
        assert!(c.plural_pronoun.is_some());
        assert!(c.collective_action_indicator.is_some());
        assert!(c.identity_formation.is_some());
    }

    #[test]
    fn empty_lexicon_disables_list_patterns() {
        let c = CompiledLexicon::compile(Lexicon::default()).unwrap();
        assert!(c.titled_name.is_none());
        assert!(c.collective_reference.is_none());
        assert!(c.identity_formation.is_none());
        assert!(c.stopwords.is_empty());
    }

    #[test]
    fn alternation_prefers_longer_phrases() {
        let terms = vec!["together".to_string(), "came together".to_string()];
        let alt = alternation(&terms).unwrap();
        assert!(alt.starts_with(r"came\s+together"));
        assert!(alternation(&[]).is_none());
    }

    #[test]
    fn titled_name_matches_with_and_without_period() {
        let c = compiled();
        let re = c.titled_name.as_ref().unwrap();
        assert_eq!(re.find("Then Mr. Smith left").unwrap().as_str(), "Mr. Smith");
        assert_eq!(re.find("and old Tom smiled").unwrap().as_str(), "old Tom");
        assert!(re.find("the old man").is_none());
    }

    #[test]
    fn multiword_indicator_matches_across_spaces() {
        let c = compiled();
        let re = c.collective_action_indicator.as_ref().unwrap();
        assert_eq!(re.find("they came  together at dawn").unwrap().as_str(), "came  together");
    }

    #[test]
    fn dialogue_patterns_capture_speakers() {
        let caps = DIALOGUE_AFTER_QUOTE[0]
            .captures(r#""Hello." John replied"#)
            .unwrap();
        assert_eq!(caps.name("n2").unwrap().as_str(), "John");
        assert_eq!(caps.name("v2").unwrap().as_str(), "replied");

        let caps = compiled()
            .dialogue_before_quote
            .captures(r#"Mr. Smith said, "Hello.""#)
            .unwrap();
        assert_eq!(caps.name("name").unwrap().as_str(), "Mr. Smith");
        assert_eq!(caps.name("verb").unwrap().as_str(), "said");
    }

    #[test]
    fn stopwords_are_case_insensitive() {
        let c = compiled();
        assert!(c.is_stopword("The"));
        assert!(c.is_stopword("IT"));
        assert!(!c.is_stopword("Tom"));
        assert!(c.is_pronoun("They"));
    }

    #[test]
    fn animal_terms_match_whole_words() {
        let c = compiled();
        assert!(c.mentions_animal("Rex the dog"));
        assert!(c.mentions_animal("Old guinea pig"));
        assert!(!c.mentions_animal("Doggerel"));
    }
}
