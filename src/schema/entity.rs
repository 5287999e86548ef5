use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::mention::{DetectionMethod, Mention};

/// Whether a registry entry is an individual or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Character,
    Collective,
}

/// Confidence bucket assigned once evidence has been fused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub const HIGH_THRESHOLD: f64 = 0.8;
    pub const MEDIUM_THRESHOLD: f64 = 0.5;

    /// Bucket a finalized confidence score.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Coarse species of an individual character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    Human,
    Animal,
}

/// Descriptive words picked up from character-description mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub physical: Vec<String>,
    pub personality: Vec<String>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.physical.is_empty() && self.personality.is_empty()
    }
}

/// An individual character or a collective, keyed by its canonical name.
///
/// Created on the first mention of a canonical name and grown by every
/// later mention within one detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub canonical_name: String,
    pub original_surface_form: String,
    pub mentions: Vec<Mention>,
    pub detection_methods: FxHashSet<DetectionMethod>,
    /// Accumulated confidence while recording; boosted and clamped after
    /// finalization.
    pub confidence: f64,
    /// Accumulated confidence before the finalization boost.
    pub raw_confidence: f64,
    pub tier: Option<ConfidenceTier>,
    pub positions: Vec<usize>,
    pub section_indices: BTreeSet<usize>,
    pub character_kind: Option<CharacterKind>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Entity {
    pub fn new(canonical_name: impl Into<String>, surface: impl Into<String>) -> Self {
        Entity {
            canonical_name: canonical_name.into(),
            original_surface_form: surface.into(),
            mentions: Vec::new(),
            detection_methods: FxHashSet::default(),
            confidence: 0.0,
            raw_confidence: 0.0,
            tier: None,
            positions: Vec::new(),
            section_indices: BTreeSet::new(),
            character_kind: None,
            attributes: Attributes::default(),
        }
    }

    /// Fold a mention into this entity. Confidence is clamped to 1.0
    /// after every addition.
    pub fn absorb(&mut self, mention: Mention) {
        self.detection_methods.insert(mention.detection_method.clone());
        self.positions.push(mention.position);
        self.section_indices.insert(mention.section_index);
        self.confidence = (self.confidence + mention.confidence).min(1.0);
        self.raw_confidence = self.confidence;
        self.mentions.push(mention);
    }

    pub fn mention_count(&self) -> usize {
        self.mentions.len()
    }

    pub fn has_method(&self, method: &DetectionMethod) -> bool {
        self.detection_methods.contains(method)
    }
}
