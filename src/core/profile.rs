//! Character profiling: species and descriptive attributes, read off the
//! mentions an entity already carries.

use crate::core::normalize::word_key;
use crate::core::patterns::CompiledLexicon;
use crate::schema::entity::{Attributes, CharacterKind, Entity};
use crate::schema::mention::DetectionMethod;

/// Fill in `character_kind` and `attributes` for an individual character.
pub fn profile(entity: &mut Entity, lexicon: &CompiledLexicon) {
    entity.character_kind = Some(character_kind(entity, lexicon));
    entity.attributes = attributes(entity, lexicon);
}

pub fn character_kind(entity: &Entity, lexicon: &CompiledLexicon) -> CharacterKind {
    let animal = entity.detection_methods.iter().any(DetectionMethod::is_animal)
        || lexicon.mentions_animal(&entity.canonical_name);
    if animal {
        CharacterKind::Animal
    } else {
        CharacterKind::Human
    }
}

/// Physical and personality words found in description mentions, first
/// occurrence only.
pub fn attributes(entity: &Entity, lexicon: &CompiledLexicon) -> Attributes {
    let mut attrs = Attributes::default();
    let descriptions = entity
        .mentions
        .iter()
        .filter(|m| m.detection_method == DetectionMethod::CharacterDescription);
    for mention in descriptions {
        for word in mention.surface_text.split_whitespace().map(word_key) {
            if lexicon.physical_attributes.contains(&word) && !attrs.physical.contains(&word) {
                attrs.physical.push(word.clone());
            }
            if lexicon.personality_traits.contains(&word) && !attrs.personality.contains(&word) {
                attrs.personality.push(word);
            }
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::mention::Mention;

    fn with_mention(name: &str, surface: &str, method: DetectionMethod) -> Entity {
        let mut entity = Entity::new(name, surface);
        entity.absorb(Mention {
            surface_text: surface.to_string(),
            position: 0,
            section_index: 0,
            detection_method: method,
            confidence: 1.0,
        });
        entity
    }

    #[test]
    fn animal_by_method_or_name() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let rex = with_mention("Rex", "Rex", DetectionMethod::AnimalCharacter);
        assert_eq!(character_kind(&rex, &lexicon), CharacterKind::Animal);

        let fox = with_mention("Old fox", "the old fox", DetectionMethod::CharacterDescription);
        assert_eq!(character_kind(&fox, &lexicon), CharacterKind::Animal);

        let anna = with_mention("Anna", "Anna", DetectionMethod::ProperName);
        assert_eq!(character_kind(&anna, &lexicon), CharacterKind::Human);
    }

    #[test]
    fn attributes_from_descriptions() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let mut man = with_mention(
            "Tall gentle man",
            "the tall gentle man",
            DetectionMethod::CharacterDescription,
        );
        profile(&mut man, &lexicon);
        assert_eq!(man.attributes.physical, vec!["tall"]);
        assert_eq!(man.attributes.personality, vec!["gentle"]);
        assert_eq!(man.character_kind, Some(CharacterKind::Human));
    }

    #[test]
    fn no_descriptions_no_attributes() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let anna = with_mention("Anna", "Anna", DetectionMethod::ProperName);
        assert!(attributes(&anna, &lexicon).is_empty());
    }
}
