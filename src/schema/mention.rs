use serde::{Deserialize, Serialize};
use std::fmt;

/// The strategy that produced a mention.
///
/// Serialized as its human-readable label, e.g. `"dialogue attribution"`
/// or `"collective action: together"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DetectionMethod {
    ProperName,
    DialogueAttribution,
    TitledName,
    ActionSubject,
    PronounReference,
    CharacterDescription,
    OccupationRole,
    AnimalCharacter,
    AnimalReference,
    CollectiveReference,
    ActingTogether,
    EnumeratedCharacters,
    PluralPronoun,
    /// Carries the lower-cased indicator phrase that triggered it.
    CollectiveAction(String),
    /// Carries the group noun that was formed.
    CollectiveFormation(String),
}

const COLLECTIVE_ACTION_PREFIX: &str = "collective action: ";
const COLLECTIVE_FORMATION_PREFIX: &str = "collective formation: ";

impl DetectionMethod {
    /// Label for fixed methods; `None` for the parameterised ones.
    pub fn static_label(&self) -> Option<&'static str> {
        Some(match self {
            Self::ProperName => "proper name",
            Self::DialogueAttribution => "dialogue attribution",
            Self::TitledName => "titled name",
            Self::ActionSubject => "action subject",
            Self::PronounReference => "pronoun reference",
            Self::CharacterDescription => "character description",
            Self::OccupationRole => "occupation/role",
            Self::AnimalCharacter => "animal character",
            Self::AnimalReference => "animal reference",
            Self::CollectiveReference => "collective reference",
            Self::ActingTogether => "characters acting together",
            Self::EnumeratedCharacters => "enumerated characters",
            Self::PluralPronoun => "plural pronoun",
            Self::CollectiveAction(_) | Self::CollectiveFormation(_) => return None,
        })
    }

    pub fn label(&self) -> String {
        match self {
            Self::CollectiveAction(indicator) => {
                format!("{COLLECTIVE_ACTION_PREFIX}{indicator}")
            }
            Self::CollectiveFormation(noun) => {
                format!("{COLLECTIVE_FORMATION_PREFIX}{noun}")
            }
            other => other.static_label().unwrap_or_default().to_string(),
        }
    }

    /// True for methods that only ever describe animals.
    pub fn is_animal(&self) -> bool {
        matches!(self, Self::AnimalCharacter | Self::AnimalReference)
    }

    /// Parse a label produced by [`DetectionMethod::label`].
    pub fn parse(label: &str) -> Option<DetectionMethod> {
        if let Some(indicator) = label.strip_prefix(COLLECTIVE_ACTION_PREFIX) {
            return Some(Self::CollectiveAction(indicator.to_string()));
        }
        if let Some(noun) = label.strip_prefix(COLLECTIVE_FORMATION_PREFIX) {
            return Some(Self::CollectiveFormation(noun.to_string()));
        }
        Some(match label {
            "proper name" => Self::ProperName,
            "dialogue attribution" => Self::DialogueAttribution,
            "titled name" => Self::TitledName,
            "action subject" => Self::ActionSubject,
            "pronoun reference" => Self::PronounReference,
            "character description" => Self::CharacterDescription,
            "occupation/role" => Self::OccupationRole,
            "animal character" => Self::AnimalCharacter,
            "animal reference" => Self::AnimalReference,
            "collective reference" => Self::CollectiveReference,
            "characters acting together" => Self::ActingTogether,
            "enumerated characters" => Self::EnumeratedCharacters,
            "plural pronoun" => Self::PluralPronoun,
            _ => return None,
        })
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<DetectionMethod> for String {
    fn from(method: DetectionMethod) -> Self {
        method.label()
    }
}

impl TryFrom<String> for DetectionMethod {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        DetectionMethod::parse(&label).ok_or_else(|| format!("unknown detection method: {label}"))
    }
}

/// A single sighting of an entity in the text. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub surface_text: String,
    /// Absolute byte offset into the analysed text.
    pub position: usize,
    pub section_index: usize,
    pub detection_method: DetectionMethod,
    pub confidence: f64,
}

/// A mention paired with the canonical name it was merged into,
/// as exposed in the flat mention lists of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMention {
    pub name: String,
    #[serde(flatten)]
    pub mention: Mention,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_parse() {
        let methods = [
            DetectionMethod::ProperName,
            DetectionMethod::OccupationRole,
            DetectionMethod::PluralPronoun,
            DetectionMethod::CollectiveAction("together".to_string()),
            DetectionMethod::CollectiveFormation("team".to_string()),
        ];
        for method in methods {
            assert_eq!(DetectionMethod::parse(&method.label()), Some(method));
        }
    }

    #[test]
    fn parameterised_labels() {
        let method = DetectionMethod::CollectiveAction("as one".to_string());
        assert_eq!(method.label(), "collective action: as one");
        assert_eq!(method.static_label(), None);
        assert_eq!(method.to_string(), "collective action: as one");
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!(DetectionMethod::parse("telepathy").is_none());
        assert!(DetectionMethod::try_from("telepathy".to_string()).is_err());
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&DetectionMethod::DialogueAttribution).unwrap();
        assert_eq!(json, "\"dialogue attribution\"");
        let back: DetectionMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DetectionMethod::DialogueAttribution);
    }

    #[test]
    fn animal_methods() {
        assert!(DetectionMethod::AnimalCharacter.is_animal());
        assert!(DetectionMethod::AnimalReference.is_animal());
        assert!(!DetectionMethod::ProperName.is_animal());
    }
}
