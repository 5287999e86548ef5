use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use super::mention::DetectionMethod;

/// One detection, as logged on the narrative timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub kind: EntityKind,
    pub canonical_name: String,
    pub position: usize,
    pub section_index: usize,
    pub detection_method: DetectionMethod,
}

/// Individual characters inferred to have joined a collective reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub collective_name: String,
    pub member_candidate_names: Vec<String>,
    pub position: usize,
    pub section_index: usize,
    /// Surface text of the collective mention, for textual transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Both transition signals. They are reported side by side and are
/// not merged or deduplicated against each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transitions {
    /// Characters whose last mention comes before each collective event.
    pub positional: Vec<Transition>,
    /// Known characters named inside a collective mention.
    pub textual: Vec<Transition>,
}

impl Transitions {
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.textual.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.textual.len()
    }
}
