use serde::{Deserialize, Serialize};

use super::entity::{ConfidenceTier, Entity};
use super::event::{TimelineEvent, Transitions};
use super::mention::NamedMention;
use super::relationship::Relationship;
use super::section::SectionSpan;

/// Everything one detection run produced.
///
/// `characters` and `collectives` are the concatenation of their high,
/// medium and low tiers, in that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionReport {
    pub sections: Vec<SectionSpan>,
    pub characters: Vec<Entity>,
    pub high_confidence: Vec<Entity>,
    pub medium_confidence: Vec<Entity>,
    pub low_confidence: Vec<Entity>,
    pub mentions: Vec<NamedMention>,
    pub collectives: Vec<Entity>,
    pub collective_high_confidence: Vec<Entity>,
    pub collective_medium_confidence: Vec<Entity>,
    pub collective_low_confidence: Vec<Entity>,
    pub collective_mentions: Vec<NamedMention>,
    pub relationships: Vec<Relationship>,
    pub timeline: Vec<TimelineEvent>,
    pub transitions: Transitions,
}

impl DetectionReport {
    pub fn character(&self, canonical_name: &str) -> Option<&Entity> {
        self.characters
            .iter()
            .find(|e| e.canonical_name == canonical_name)
    }

    pub fn collective(&self, canonical_name: &str) -> Option<&Entity> {
        self.collectives
            .iter()
            .find(|e| e.canonical_name == canonical_name)
    }

    /// Look up the edge between two canonical names, in either order.
    pub fn relationship(&self, a: &str, b: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(a, b))
    }

    pub fn characters_in_tier(&self, tier: ConfidenceTier) -> &[Entity] {
        match tier {
            ConfidenceTier::High => &self.high_confidence,
            ConfidenceTier::Medium => &self.medium_confidence,
            ConfidenceTier::Low => &self.low_confidence,
        }
    }

    pub fn collectives_in_tier(&self, tier: ConfidenceTier) -> &[Entity] {
        match tier {
            ConfidenceTier::High => &self.collective_high_confidence,
            ConfidenceTier::Medium => &self.collective_medium_confidence,
            ConfidenceTier::Low => &self.collective_low_confidence,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.collectives.is_empty() && self.relationships.is_empty()
    }
}
