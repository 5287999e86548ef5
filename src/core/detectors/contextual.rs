//! Contextual strategies: a name counts because of what surrounds it
//! (a speech verb next to a quotation, an action verb after it, a
//! determiner before a role word).

use regex::Match;
use rustc_hash::FxHashSet;

use crate::core::detectors::collapse_whitespace;
use crate::core::normalize::word_key;
use crate::core::patterns::{CompiledLexicon, DIALOGUE_AFTER_QUOTE, WORD};
use crate::core::strategy::{Candidate, Strategy};
use crate::schema::mention::DetectionMethod;
use crate::schema::section::Section;

/// Confidence of a pronoun standing in as an action subject.
const PRONOUN_CONFIDENCE: f64 = 0.5;

/// Speakers of quoted dialogue, attributed before or after the quote.
///
/// Each speaker is recorded at its own offset, once, even when both the
/// preceding and the following quotation point at it.
pub struct DialogueAttribution;

impl Strategy for DialogueAttribution {
    fn name(&self) -> &'static str {
        "dialogue attribution"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let text = section.text;
        let mut speakers: Vec<(usize, String)> = Vec::new();
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut push = |speaker: Match<'_>| {
            if seen.insert(speaker.start()) {
                speakers.push((speaker.start(), collapse_whitespace(speaker.as_str())));
            }
        };

        for re in DIALOGUE_AFTER_QUOTE.iter() {
            for caps in re.captures_iter(text) {
                let attribution = [("v1", "n1"), ("v2", "n2"), ("v3", "n3")]
                    .iter()
                    .find_map(|(v, n)| Some((caps.name(v)?, caps.name(n)?)));
                let Some((verb, speaker)) = attribution else {
                    continue;
                };
                if lexicon.speech_verbs.contains(verb.as_str())
                    && !lexicon.is_stopword(speaker.as_str())
                {
                    push(speaker);
                }
            }
        }

        for caps in lexicon.dialogue_before_quote.captures_iter(text) {
            let (Some(speaker), Some(verb)) = (caps.name("name"), caps.name("verb")) else {
                continue;
            };
            let bare = speaker.as_str().split_whitespace().last().unwrap_or_default();
            if lexicon.speech_verbs.contains(verb.as_str()) && !lexicon.is_stopword(bare) {
                push(speaker);
            }
        }

        speakers.sort_by_key(|(offset, _)| *offset);
        speakers
            .into_iter()
            .map(|(offset, speaker)| {
                Candidate::character(
                    speaker,
                    section.absolute(offset),
                    DetectionMethod::DialogueAttribution,
                )
            })
            .collect()
    }
}

/// Subjects of action, emotion and mental verbs: the nearest capitalized
/// name or pronoun before the verb in the same sentence.
pub struct ActionSubjects;

impl Strategy for ActionSubjects {
    fn name(&self) -> &'static str {
        "action subjects"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let words: Vec<Match<'_>> = WORD.find_iter(section.text).collect();
        let keys: Vec<String> = words.iter().map(|w| word_key(w.as_str())).collect();
        let mut out = Vec::new();
        let mut sentence_start = 0;

        for i in 0..words.len() {
            if is_subject_verb(&keys, i, lexicon) {
                if let Some(candidate) = subject_before(&words[sentence_start..i], section, lexicon)
                {
                    out.push(candidate);
                }
            }
            if ends_sentence(words[i].as_str()) {
                sentence_start = i + 1;
            }
        }
        out
    }
}

fn is_subject_verb(keys: &[String], i: usize, lexicon: &CompiledLexicon) -> bool {
    if lexicon.subject_verbs.contains(&keys[i]) {
        return true;
    }
    keys.get(i + 1)
        .is_some_and(|next| lexicon.subject_verbs.contains(&format!("{} {}", keys[i], next)))
}

/// Scan backwards for the nearest name (full confidence) or pronoun.
fn subject_before(
    words: &[Match<'_>],
    section: &Section<'_>,
    lexicon: &CompiledLexicon,
) -> Option<Candidate> {
    for word in words.iter().rev() {
        let raw = word.as_str();
        let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if trimmed.is_empty() {
            continue;
        }
        let offset = word.start() + raw.find(trimmed).unwrap_or(0);
        if is_capitalized_name(trimmed) && !lexicon.is_stopword(trimmed) {
            return Some(Candidate::character(
                trimmed,
                section.absolute(offset),
                DetectionMethod::ActionSubject,
            ));
        }
        if lexicon.is_pronoun(trimmed) {
            return Some(
                Candidate::character(
                    trimmed,
                    section.absolute(offset),
                    DetectionMethod::PronounReference,
                )
                .with_confidence(PRONOUN_CONFIDENCE),
            );
        }
    }
    None
}

/// `Xxx`: one ASCII capital followed by lower-case letters.
fn is_capitalized_name(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && token.len() > 1
        && chars.all(|c| c.is_ascii_lowercase())
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', '”', '’', ')'])
        .ends_with(['.', '!', '?'])
}

/// Occupation or relationship words after a determiner ("the doctor",
/// "his father"), and `the <occupation> named <Name>`.
pub struct OccupationRoles;

impl Strategy for OccupationRoles {
    fn name(&self) -> &'static str {
        "occupations"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let text = section.text;
        let mut out = Vec::new();

        let words: Vec<Match<'_>> = WORD.find_iter(text).collect();
        for pair in words.windows(2) {
            let (det, role) = (&pair[0], &pair[1]);
            let role_key = word_key(role.as_str());
            if !lexicon.role_terms.contains(&role_key) {
                continue;
            }
            let det_raw = det
                .as_str()
                .trim_start_matches(|c: char| !c.is_alphanumeric());
            let det_key = det_raw.to_lowercase();
            if det_raw.is_empty() || !lexicon.role_determiners.contains(&det_key) {
                continue;
            }
            let offset = det.end() - det_raw.len();
            out.push(Candidate::character(
                format!("{det_key} {role_key}"),
                section.absolute(offset),
                DetectionMethod::OccupationRole,
            ));
        }

        if let Some(re) = &lexicon.named_occupation {
            for caps in re.captures_iter(text) {
                if let Some(name) = caps.name("name") {
                    out.push(Candidate::character(
                        collapse_whitespace(name.as_str()),
                        section.absolute(name.start()),
                        DetectionMethod::OccupationRole,
                    ));
                }
            }
        }
        out
    }
}
