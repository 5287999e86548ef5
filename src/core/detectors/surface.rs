//! Surface-form strategies: names and descriptions read straight off the
//! text without looking at the surrounding sentence.

use crate::core::detectors::{collapse_whitespace, next_boundary};
use crate::core::patterns::{CompiledLexicon, NAME_TOKEN, PROPER_NAME};
use crate::core::strategy::{Candidate, Strategy};
use crate::schema::mention::DetectionMethod;
use crate::schema::section::Section;

/// Runs of capitalized words. Leading stopwords ("The", "It") are
/// dropped; a run made only of stopwords is skipped.
pub struct ProperNames;

impl Strategy for ProperNames {
    fn name(&self) -> &'static str {
        "proper names"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        PROPER_NAME
            .find_iter(section.text)
            .filter_map(|m| {
                let run = m.as_str();
                let first = NAME_TOKEN
                    .find_iter(run)
                    .find(|token| !lexicon.is_stopword(token.as_str()))?;
                Some(Candidate::character(
                    collapse_whitespace(&run[first.start()..]),
                    section.absolute(m.start() + first.start()),
                    DetectionMethod::ProperName,
                ))
            })
            .collect()
    }
}

/// `Mr. Smith`, `Captain Ahab`, `old Tom`.
pub struct TitledNames;

impl Strategy for TitledNames {
    fn name(&self) -> &'static str {
        "titled names"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let Some(re) = &lexicon.titled_name else {
            return Vec::new();
        };
        re.find_iter(section.text)
            .map(|m| {
                Candidate::character(
                    collapse_whitespace(m.as_str()),
                    section.absolute(m.start()),
                    DetectionMethod::TitledName,
                )
            })
            .collect()
    }
}

/// `the dog`, `a fox named Rex`. A named animal is recorded under its
/// name so it merges with other sightings of that name.
pub struct AnimalCharacters;

impl Strategy for AnimalCharacters {
    fn name(&self) -> &'static str {
        "animal characters"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let mut out = Vec::new();
        for caps in lexicon.animal_name.captures_iter(section.text) {
            let (Some(whole), Some(kind)) = (caps.get(0), caps.name("kind")) else {
                continue;
            };
            let kind = kind.as_str().to_lowercase();
            if !lexicon.animal_terms.contains(&kind) {
                continue;
            }
            let candidate = match caps.name("name") {
                Some(name) => Candidate::character(
                    name.as_str(),
                    section.absolute(name.start()),
                    DetectionMethod::AnimalCharacter,
                ),
                None => Candidate::character(
                    format!("the {kind}"),
                    section.absolute(whole.start()),
                    DetectionMethod::AnimalCharacter,
                ),
            };
            out.push(candidate);
        }
        out
    }
}

/// `the <animal term>`, including multi-word terms such as "guinea pig".
pub struct AnimalReferences;

impl Strategy for AnimalReferences {
    fn name(&self) -> &'static str {
        "animal references"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let Some(re) = &lexicon.the_animal else {
            return Vec::new();
        };
        re.captures_iter(section.text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let animal = caps.name("animal")?;
                Some(Candidate::character(
                    format!("the {}", collapse_whitespace(&animal.as_str().to_lowercase())),
                    section.absolute(whole.start()),
                    DetectionMethod::AnimalReference,
                ))
            })
            .collect()
    }
}

/// Article, one to three modifiers and a description noun: "the old man",
/// "a small gray fox". Matches whose modifiers contain a stopword are
/// rejected and the search resumes just past the rejected start.
pub struct CharacterDescriptions;

impl Strategy for CharacterDescriptions {
    fn name(&self) -> &'static str {
        "character descriptions"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let Some(re) = &lexicon.character_description else {
            return Vec::new();
        };
        let text = section.text;
        let mut out = Vec::new();
        let mut at = 0;
        while at < text.len() {
            let Some(caps) = re.captures_at(text, at) else {
                break;
            };
            let (Some(whole), Some(modifiers)) = (caps.get(0), caps.name("modifiers")) else {
                break;
            };
            let clean = modifiers
                .as_str()
                .split_whitespace()
                .all(|word| !lexicon.is_stopword(word));
            if clean {
                out.push(Candidate::character(
                    collapse_whitespace(&whole.as_str().to_lowercase()),
                    section.absolute(whole.start()),
                    DetectionMethod::CharacterDescription,
                ));
                at = whole.end();
            } else {
                at = next_boundary(text, whole.start());
            }
        }
        out
    }
}
