//! The detection pipeline: Text → Report orchestration.
//!
//! Wires together segmentation, the strategy passes, the entity registries,
//! the relationship graph, confidence tiering and transition analysis.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::core::confidence::classify;
use crate::core::detectors::{default_strategies, DEFAULT_CONTEXT_WINDOW};
use crate::core::lexicon::{Lexicon, LexiconError};
use crate::core::patterns::CompiledLexicon;
use crate::core::profile::profile;
use crate::core::registry::EntityRegistry;
use crate::core::relationships::RelationshipGraph;
use crate::core::segmenter::segment;
use crate::core::strategy::{Candidate, Strategy};
use crate::core::timeline::{analyze, sort_timeline};
use crate::schema::entity::EntityKind;
use crate::schema::event::TimelineEvent;
use crate::schema::report::DetectionReport;
use crate::schema::section::Section;

/// Largest input accepted by default: 4 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("input is {len} bytes, limit is {max}")]
    InputTooLarge { len: usize, max: usize },
}

/// The top-level detector. Built via `CastDetector::builder()`.
///
/// A detector holds only configuration; every call to [`CastDetector::detect`]
/// starts from empty registries.
pub struct CastDetector {
    lexicon: CompiledLexicon,
    strategies: Vec<Box<dyn Strategy>>,
    context_window: usize,
    max_input_bytes: usize,
}

/// Builder for constructing a `CastDetector`.
pub struct CastDetectorBuilder {
    use_builtin: bool,
    lexicon_paths: Vec<PathBuf>,
    /// Directly provided lexicons (for testing without files).
    lexicons: Vec<Lexicon>,
    context_window: usize,
    max_input_bytes: usize,
    disabled: Vec<String>,
    extra_strategies: Vec<Box<dyn Strategy>>,
}

/// Everything one section contributed, in strategy order.
struct SectionScan {
    section_index: usize,
    candidates: Vec<Candidate>,
}

impl CastDetector {
    pub fn builder() -> CastDetectorBuilder {
        CastDetectorBuilder {
            use_builtin: true,
            lexicon_paths: Vec::new(),
            lexicons: Vec::new(),
            context_window: DEFAULT_CONTEXT_WINDOW,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            disabled: Vec::new(),
            extra_strategies: Vec::new(),
        }
    }

    /// Detect characters, collectives and relationships in `text`.
    pub fn detect(&self, text: &str) -> Result<DetectionReport, DetectError> {
        if text.len() > self.max_input_bytes {
            return Err(DetectError::InputTooLarge {
                len: text.len(),
                max: self.max_input_bytes,
            });
        }

        let sections = segment(text);
        debug!(
            bytes = text.len(),
            sections = sections.len(),
            strategies = self.strategies.len(),
            "detecting cast"
        );
        let scans = self.scan_sections(&sections);

        let mut characters = EntityRegistry::new(EntityKind::Character);
        let mut collectives = EntityRegistry::new(EntityKind::Collective);
        let mut graph = RelationshipGraph::new();
        let mut timeline: Vec<TimelineEvent> = Vec::new();

        for scan in scans {
            for candidate in scan.candidates {
                match candidate {
                    Candidate::Character {
                        surface,
                        position,
                        method,
                        confidence,
                    } => {
                        let recorded = characters.record(
                            &surface,
                            position,
                            scan.section_index,
                            method.clone(),
                            confidence,
                        );
                        if let Some(name) = recorded {
                            timeline.push(TimelineEvent {
                                kind: EntityKind::Character,
                                canonical_name: name,
                                position,
                                section_index: scan.section_index,
                                detection_method: method,
                            });
                        }
                    }
                    Candidate::Collective {
                        surface,
                        position,
                        method,
                        confidence,
                    } => {
                        let recorded = collectives.record(
                            &surface,
                            position,
                            scan.section_index,
                            method.clone(),
                            confidence,
                        );
                        if let Some(name) = recorded {
                            timeline.push(TimelineEvent {
                                kind: EntityKind::Collective,
                                canonical_name: name,
                                position,
                                section_index: scan.section_index,
                                detection_method: method,
                            });
                        }
                    }
                    Candidate::Relationship {
                        a,
                        b,
                        rel_type,
                        position,
                    } => {
                        graph.record(&a, &b, &rel_type, position);
                    }
                }
            }
        }

        let (mut character_entities, mentions) = characters.into_parts();
        let (collective_entities, collective_mentions) = collectives.into_parts();
        for entity in character_entities.iter_mut() {
            profile(entity, &self.lexicon);
        }
        let character_names: FxHashSet<String> = character_entities
            .iter()
            .map(|e| e.canonical_name.clone())
            .collect();

        let character_tiers = classify(character_entities);
        let collective_tiers = classify(collective_entities);

        sort_timeline(&mut timeline);
        let transitions = analyze(&timeline, &collective_mentions, |name| {
            character_names.contains(name)
        });
        let relationships = graph.summarize();

        debug!(
            characters = character_names.len(),
            collectives = collective_tiers.high.len()
                + collective_tiers.medium.len()
                + collective_tiers.low.len(),
            relationships = relationships.len(),
            transitions = transitions.len(),
            "cast detected"
        );

        Ok(DetectionReport {
            sections: sections.iter().map(Section::span).collect(),
            characters: character_tiers.concatenated(),
            high_confidence: character_tiers.high,
            medium_confidence: character_tiers.medium,
            low_confidence: character_tiers.low,
            mentions,
            collectives: collective_tiers.concatenated(),
            collective_high_confidence: collective_tiers.high,
            collective_medium_confidence: collective_tiers.medium,
            collective_low_confidence: collective_tiers.low,
            collective_mentions,
            relationships,
            timeline,
            transitions,
        })
    }

    /// Names of the active strategies, in run order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn lexicon(&self) -> &CompiledLexicon {
        &self.lexicon
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    pub fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_sections(&self, sections: &[Section<'_>]) -> Vec<SectionScan> {
        sections.iter().map(|s| self.scan(s)).collect()
    }

    /// Sections are independent; results come back in section order, so
    /// the single-threaded merge sees the same sequence as the serial path.
    #[cfg(feature = "parallel")]
    fn scan_sections(&self, sections: &[Section<'_>]) -> Vec<SectionScan> {
        sections.par_iter().map(|s| self.scan(s)).collect()
    }

    fn scan(&self, section: &Section<'_>) -> SectionScan {
        let mut candidates = Vec::new();
        if !section.is_empty() {
            for strategy in &self.strategies {
                let found = strategy.detect(section, &self.lexicon);
                trace!(
                    strategy = strategy.name(),
                    section = section.index,
                    found = found.len(),
                    "strategy pass"
                );
                candidates.extend(found);
            }
        }
        SectionScan {
            section_index: section.index,
            candidates,
        }
    }
}

impl CastDetectorBuilder {
    /// Merge a RON lexicon file on top of the built-in table.
    pub fn lexicon(mut self, path: impl AsRef<Path>) -> Self {
        self.lexicon_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge an in-memory lexicon on top of the built-in table.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicons.push(lexicon);
        self
    }

    /// Start from an empty lexicon instead of the built-in one.
    pub fn without_builtin_lexicon(mut self) -> Self {
        self.use_builtin = false;
        self
    }

    /// Bytes searched on each side of a collective-action indicator.
    /// Identity formation searches twice as far.
    pub fn context_window(mut self, bytes: usize) -> Self {
        self.context_window = bytes;
        self
    }

    pub fn max_input_bytes(mut self, bytes: usize) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    /// Skip a built-in strategy by name, e.g. `"dialogue attribution"`.
    pub fn disable(mut self, strategy: &str) -> Self {
        self.disabled.push(strategy.to_string());
        self
    }

    /// Run an extra strategy after the built-in ones.
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.extra_strategies.push(Box::new(strategy));
        self
    }

    pub fn build(self) -> Result<CastDetector, DetectError> {
        let mut lexicon = if self.use_builtin {
            Lexicon::builtin()
        } else {
            Lexicon::default()
        };
        for path in &self.lexicon_paths {
            debug!(path = %path.display(), "merging lexicon file");
            lexicon.merge(Lexicon::load_from_ron(path)?);
        }
        for extra in self.lexicons {
            lexicon.merge(extra);
        }
        let lexicon = CompiledLexicon::compile(lexicon)?;

        let disabled = self.disabled;
        let mut strategies: Vec<Box<dyn Strategy>> = default_strategies(self.context_window)
            .into_iter()
            .filter(|s| !disabled.iter().any(|d| d == s.name()))
            .collect();
        strategies.extend(self.extra_strategies);

        Ok(CastDetector {
            lexicon,
            strategies,
            context_window: self.context_window,
            max_input_bytes: self.max_input_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::mention::DetectionMethod;

    #[test]
    fn builder_defaults() {
        let detector = CastDetector::builder().build().unwrap();
        assert_eq!(detector.strategy_names().len(), 14);
        assert_eq!(detector.context_window(), DEFAULT_CONTEXT_WINDOW);
        assert_eq!(detector.max_input_bytes(), DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn disable_removes_strategy() {
        let detector = CastDetector::builder()
            .disable("plural pronouns")
            .build()
            .unwrap();
        assert_eq!(detector.strategy_names().len(), 13);
        let report = detector.detect("They ran.").unwrap();
        assert!(report.collective("They").is_none());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let detector = CastDetector::builder().max_input_bytes(8).build().unwrap();
        assert!(matches!(
            detector.detect("far too long for the limit"),
            Err(DetectError::InputTooLarge { len: 26, max: 8 })
        ));
    }

    #[test]
    fn missing_lexicon_file_is_an_io_error() {
        let result = CastDetector::builder()
            .lexicon("/nonexistent/lexicon.ron")
            .build();
        assert!(matches!(
            result,
            Err(DetectError::Lexicon(LexiconError::Io(_)))
        ));
    }

    #[test]
    fn empty_text_gives_empty_report() {
        let report = CastDetector::builder().build().unwrap().detect("").unwrap();
        assert!(report.is_empty());
        assert_eq!(report.sections.len(), 1);
        assert!(report.timeline.is_empty());
        assert!(report.transitions.is_empty());
    }

    #[test]
    fn oversized_context_window_is_clamped() {
        let report = CastDetector::builder()
            .context_window(usize::MAX)
            .build()
            .unwrap()
            .detect("Tom and Jerry worked together. They formed a team.")
            .unwrap();
        assert!(report.collective("Team").is_some());
        assert!(report.relationship("Tom", "Jerry").is_some());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_scan_matches_sequential() {
        let text = include_str!("../../tests/fixtures/story.txt");
        let detector = CastDetector::builder().build().unwrap();
        let sections = segment(text);

        let parallel = detector.scan_sections(&sections);
        let sequential: Vec<SectionScan> = sections.iter().map(|s| detector.scan(s)).collect();

        assert_eq!(parallel.len(), sequential.len());
        for (p, s) in parallel.iter().zip(&sequential) {
            assert_eq!(p.section_index, s.section_index);
            assert_eq!(p.candidates, s.candidates);
        }
    }

    struct ShoutedNames;

    impl Strategy for ShoutedNames {
        fn name(&self) -> &'static str {
            "shouted names"
        }

        fn detect(&self, section: &Section<'_>, _: &CompiledLexicon) -> Vec<Candidate> {
            section
                .text
                .match_indices("BOB")
                .map(|(i, _)| {
                    Candidate::character("Bob", section.absolute(i), DetectionMethod::ProperName)
                })
                .collect()
        }
    }

    #[test]
    fn extra_strategy_runs() {
        let detector = CastDetector::builder()
            .without_builtin_lexicon()
            .with_strategy(ShoutedNames)
            .build()
            .unwrap();
        let report = detector.detect("then BOB left").unwrap();
        let bob = report.character("Bob").unwrap();
        assert_eq!(bob.positions, vec![5]);
    }
}
