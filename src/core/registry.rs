//! Entity registry: merges mentions that share a canonical name.
//!
//! One registry is created per kind (characters, collectives) at the start
//! of a detection run and consumed when the report is assembled.

use rustc_hash::FxHashMap;

use crate::core::normalize::canonicalize;
use crate::schema::entity::{Entity, EntityKind};
use crate::schema::mention::{DetectionMethod, Mention, NamedMention};

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    kind: EntityKind,
    index: FxHashMap<String, usize>,
    entities: Vec<Entity>,
    mentions: Vec<NamedMention>,
}

impl EntityRegistry {
    pub fn new(kind: EntityKind) -> Self {
        EntityRegistry {
            kind,
            index: FxHashMap::default(),
            entities: Vec::new(),
            mentions: Vec::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Record one mention and return the canonical name it merged into.
    /// Surfaces that canonicalize to nothing are dropped.
    pub fn record(
        &mut self,
        surface: &str,
        position: usize,
        section_index: usize,
        method: DetectionMethod,
        confidence: f64,
    ) -> Option<String> {
        let canonical = canonicalize(surface);
        if canonical.is_empty() {
            return None;
        }

        let slot = match self.index.get(&canonical) {
            Some(&slot) => slot,
            None => {
                self.entities.push(Entity::new(canonical.clone(), surface.trim()));
                self.index.insert(canonical.clone(), self.entities.len() - 1);
                self.entities.len() - 1
            }
        };

        let mention = Mention {
            surface_text: surface.to_string(),
            position,
            section_index,
            detection_method: method,
            confidence,
        };
        self.mentions.push(NamedMention {
            name: canonical.clone(),
            mention: mention.clone(),
        });
        self.entities[slot].absorb(mention);
        Some(canonical)
    }

    pub fn get(&self, canonical_name: &str) -> Option<&Entity> {
        self.index.get(canonical_name).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, canonical_name: &str) -> bool {
        self.index.contains_key(canonical_name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in first-seen order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Flat mention list in recording order.
    pub fn mentions(&self) -> &[NamedMention] {
        &self.mentions
    }

    /// Consume the registry into its entities and flat mention list.
    pub fn into_parts(self) -> (Vec<Entity>, Vec<NamedMention>) {
        (self.entities, self.mentions)
    }
}
