//! Collective strategies: groups named outright, characters listed or
//! acting together, and groups that form in the text.

use crate::core::detectors::{collapse_whitespace, names_in, window};
use crate::core::normalize::word_key;
use crate::core::patterns::{
    CompiledLexicon, AND_ENUMERATION, CONJUNCTION_CHAIN, ENUMERATION, NAME_TOKEN, WORD,
};
use crate::core::strategy::{pairwise, Candidate, Strategy};
use crate::schema::mention::DetectionMethod;
use crate::schema::section::Section;

const ASSOCIATED_WITH: &str = "associated with";

/// Plural pronouns are weak evidence of a group on their own.
const PLURAL_PRONOUN_CONFIDENCE: f64 = 0.3;

/// Determiner plus collective noun: "the pack", "their family".
pub struct CollectiveReferences;

impl Strategy for CollectiveReferences {
    fn name(&self) -> &'static str {
        "collective references"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let Some(re) = &lexicon.collective_reference else {
            return Vec::new();
        };
        re.captures_iter(section.text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(Candidate::collective(
                    collapse_whitespace(&whole.as_str().to_lowercase()),
                    section.absolute(whole.start()),
                    DetectionMethod::CollectiveReference,
                ))
            })
            .collect()
    }
}

/// Names chained with "and". Each chain is one collective and every
/// pair of names in it is associated.
pub struct ActingTogether;

impl Strategy for ActingTogether {
    fn name(&self) -> &'static str {
        "acting together"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let mut out = Vec::new();
        for m in CONJUNCTION_CHAIN.find_iter(section.text) {
            let names = listed_names(m.as_str(), lexicon);
            if names.len() < 2 {
                continue;
            }
            let position = section.absolute(m.start());
            out.push(Candidate::collective(
                names.join(" and "),
                position,
                DetectionMethod::ActingTogether,
            ));
            out.extend(pairwise(&names, ASSOCIATED_WITH, position));
        }
        out
    }
}

/// Comma lists closed by "and" ("Tom, Jerry and Spike"), and lists of
/// three or more names joined only by "and". The and-only form is named
/// like an acting-together chain so both records land on one collective.
pub struct EnumeratedCharacters;

impl Strategy for EnumeratedCharacters {
    fn name(&self) -> &'static str {
        "enumerated characters"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let mut out = Vec::new();
        let mut comma_spans = Vec::new();
        for m in ENUMERATION.find_iter(section.text) {
            comma_spans.push(m.range());
            let names = listed_names(m.as_str(), lexicon);
            let Some((last, rest)) = names.split_last() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let position = section.absolute(m.start());
            out.push(Candidate::collective(
                format!("{} and {}", rest.join(", "), last),
                position,
                DetectionMethod::EnumeratedCharacters,
            ));
            out.extend(pairwise(&names, ASSOCIATED_WITH, position));
        }

        for m in AND_ENUMERATION.find_iter(section.text) {
            let overlaps = comma_spans
                .iter()
                .any(|span| m.start() < span.end && span.start < m.end());
            let names = listed_names(m.as_str(), lexicon);
            if overlaps || names.len() < 3 {
                continue;
            }
            let position = section.absolute(m.start());
            out.push(Candidate::collective(
                names.join(" and "),
                position,
                DetectionMethod::EnumeratedCharacters,
            ));
            out.extend(pairwise(&names, ASSOCIATED_WITH, position));
        }

        out.sort_by_key(Candidate::position);
        out
    }
}

/// Every name token in a list match, stopwords removed, order kept.
fn listed_names(list: &str, lexicon: &CompiledLexicon) -> Vec<String> {
    NAME_TOKEN
        .find_iter(list)
        .map(|m| m.as_str())
        .filter(|name| !lexicon.is_stopword(name))
        .map(str::to_string)
        .collect()
}

pub struct PluralPronouns;

impl Strategy for PluralPronouns {
    fn name(&self) -> &'static str {
        "plural pronouns"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let Some(re) = &lexicon.plural_pronoun else {
            return Vec::new();
        };
        re.find_iter(section.text)
            .map(|m| {
                Candidate::collective(
                    m.as_str(),
                    section.absolute(m.start()),
                    DetectionMethod::PluralPronoun,
                )
                .with_confidence(PLURAL_PRONOUN_CONFIDENCE)
            })
            .collect()
    }
}

/// Phrases such as "together" or "joined forces", tied to the names
/// within `context_window` bytes on either side.
///
/// With no names nearby, the indicator is credited to the nearest
/// collective reference in the same window instead. Relationship edges
/// need at least two names.
pub struct CollectiveActions {
    pub context_window: usize,
}

impl Strategy for CollectiveActions {
    fn name(&self) -> &'static str {
        "collective actions"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let Some(re) = &lexicon.collective_action_indicator else {
            return Vec::new();
        };
        let text = section.text;
        let mut out = Vec::new();
        for m in re.find_iter(text) {
            let indicator = collapse_whitespace(&m.as_str().to_lowercase());
            let position = section.absolute(m.start());
            let method = DetectionMethod::CollectiveAction(indicator.clone());
            let range = window(text, m.start(), self.context_window);
            let names = names_in(text, range.clone(), lexicon);

            if !names.is_empty() {
                out.push(Candidate::collective(names.join(" and "), position, method));
                out.extend(pairwise(&names, &format!("acted {indicator} with"), position));
                continue;
            }

            let Some(reference_re) = &lexicon.collective_reference else {
                continue;
            };
            let nearest = reference_re
                .find_iter(text)
                .filter(|r| r.start() >= range.start && r.end() <= range.end)
                .min_by_key(|r| r.start().abs_diff(m.start()));
            if let Some(reference) = nearest {
                out.push(Candidate::collective(
                    collapse_whitespace(&reference.as_str().to_lowercase()),
                    position,
                    method,
                ));
            }
        }
        out
    }
}

/// "formed a team", "became their own family". The group noun becomes a
/// collective when a name or plural pronoun lies within twice the
/// context window; every pair of those names gets a "formed <noun> with"
/// edge.
pub struct IdentityFormation {
    pub context_window: usize,
}

impl Strategy for IdentityFormation {
    fn name(&self) -> &'static str {
        "identity formation"
    }

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate> {
        let Some(re) = &lexicon.identity_formation else {
            return Vec::new();
        };
        let text = section.text;
        let mut out = Vec::new();
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(noun)) = (caps.get(0), caps.name("noun")) else {
                continue;
            };
            let range = window(text, whole.start(), self.context_window.saturating_mul(2));
            let names = names_in(text, range.clone(), lexicon);
            let has_pronoun = WORD
                .find_iter(text)
                .filter(|w| w.start() >= range.start && w.end() <= range.end)
                .any(|w| lexicon.formation_pronouns.contains(&word_key(w.as_str())));
            if names.is_empty() && !has_pronoun {
                continue;
            }

            let noun = collapse_whitespace(&noun.as_str().to_lowercase());
            let position = section.absolute(whole.start());
            out.push(Candidate::collective(
                noun.clone(),
                position,
                DetectionMethod::CollectiveFormation(noun.clone()),
            ));
            out.extend(pairwise(&names, &format!("formed {noun} with"), position));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::detectors::DEFAULT_CONTEXT_WINDOW;

    fn run(strategy: &dyn Strategy, text: &str) -> Vec<Candidate> {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let section = Section {
            index: 0,
            text,
            start_offset: 0,
        };
        strategy.detect(&section, &lexicon)
    }

    fn collectives(candidates: &[Candidate]) -> Vec<(&str, &DetectionMethod)> {
        candidates
            .iter()
            .filter_map(|c| match c {
                Candidate::Collective {
                    surface, method, ..
                } => Some((surface.as_str(), method)),
                _ => None,
            })
            .collect()
    }

    fn edges(candidates: &[Candidate]) -> Vec<(&str, &str, &str)> {
        candidates
            .iter()
            .filter_map(|c| match c {
                Candidate::Relationship { a, b, rel_type, .. } => {
                    Some((a.as_str(), b.as_str(), rel_type.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn collective_references_keep_determiner() {
        let found = run(&CollectiveReferences, "The pack ran past their Family.");
        let names: Vec<&str> = collectives(&found).into_iter().map(|c| c.0).collect();
        assert_eq!(names, vec!["the pack", "their family"]);
    }

    #[test]
    fn acting_together_chain() {
        let found = run(&ActingTogether, "Tom and Jerry and Spike ran.");
        assert_eq!(collectives(&found).len(), 1);
        assert_eq!(collectives(&found)[0].0, "Tom and Jerry and Spike");
        assert_eq!(
            edges(&found),
            vec![
                ("Tom", "Jerry", "associated with"),
                ("Tom", "Spike", "associated with"),
                ("Jerry", "Spike", "associated with"),
            ]
        );
    }

    #[test]
    fn enumeration_builds_group_name() {
        let found = run(&EnumeratedCharacters, "Anna, Boris, Clara and Dmitri met.");
        assert_eq!(collectives(&found)[0].0, "Anna, Boris, Clara and Dmitri");
        assert_eq!(edges(&found).len(), 6);
    }

    #[test]
    fn enumeration_without_commas() {
        let found = run(&EnumeratedCharacters, "Tom and Jerry and Spike ran.");
        let groups = collectives(&found);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Tom and Jerry and Spike");
        assert_eq!(groups[0].1, &DetectionMethod::EnumeratedCharacters);
        assert_eq!(edges(&found).len(), 3);
    }

    #[test]
    fn two_names_are_not_an_enumeration() {
        assert!(run(&EnumeratedCharacters, "Tom and Jerry ran.").is_empty());
    }

    #[test]
    fn comma_list_wins_over_overlapping_and_chain() {
        let found = run(&EnumeratedCharacters, "Tom, Jerry and Spike and Max ran.");
        let groups = collectives(&found);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Tom, Jerry and Spike");
    }

    #[test]
    fn plural_pronouns_are_weak() {
        let found = run(&PluralPronouns, "They said we should go.");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| matches!(
            c,
            Candidate::Collective { confidence, .. } if *confidence == 0.3
        )));
    }

    #[test]
    fn indicator_with_names_links_them() {
        let strategy = CollectiveActions {
            context_window: DEFAULT_CONTEXT_WINDOW,
        };
        let found = run(&strategy, "Tom and Jerry worked together.");
        let groups = collectives(&found);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Tom and Jerry");
        assert_eq!(
            groups[0].1,
            &DetectionMethod::CollectiveAction("worked together".to_string())
        );
        assert_eq!(edges(&found)[0], ("Tom", "Jerry", "acted worked together with"));
    }

    #[test]
    fn indicator_without_names_credits_collective_reference() {
        let strategy = CollectiveActions {
            context_window: DEFAULT_CONTEXT_WINDOW,
        };
        let found = run(&strategy, "The pack hunted together.");
        let groups = collectives(&found);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "the pack");
        assert_eq!(
            groups[0].1,
            &DetectionMethod::CollectiveAction("together".to_string())
        );
        assert!(edges(&found).is_empty());
    }

    #[test]
    fn indicator_with_nothing_nearby_is_silent() {
        let strategy = CollectiveActions {
            context_window: DEFAULT_CONTEXT_WINDOW,
        };
        assert!(run(&strategy, "It all happened together.").is_empty());
    }

    #[test]
    fn formation_with_pronoun_only() {
        let strategy = IdentityFormation {
            context_window: DEFAULT_CONTEXT_WINDOW,
        };
        let found = run(&strategy, "and so they formed a team.");
        let groups = collectives(&found);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "team");
        assert!(edges(&found).is_empty());
    }

    #[test]
    fn huge_windows_cover_the_whole_section() {
        let actions = CollectiveActions {
            context_window: usize::MAX,
        };
        let found = run(&actions, "Tom and Jerry worked together.");
        assert_eq!(collectives(&found).len(), 1);

        let formation = IdentityFormation {
            context_window: usize::MAX / 2 + 1,
        };
        let found = run(&formation, "They formed a team.");
        assert_eq!(collectives(&found)[0].0, "team");
    }

    #[test]
    fn formation_links_names() {
        let strategy = IdentityFormation {
            context_window: DEFAULT_CONTEXT_WINDOW,
        };
        let found = run(&strategy, "Anna and Boris became their own family.");
        assert_eq!(
            collectives(&found)[0].1,
            &DetectionMethod::CollectiveFormation("family".to_string())
        );
        assert_eq!(edges(&found), vec![("Anna", "Boris", "formed family with")]);
    }
}
