use serde::{Deserialize, Serialize};

/// Undirected evidence between two canonical entities.
///
/// `relationship_types` is a multiset in insertion order: every
/// co-occurrence appends one entry and one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub entity_a: String,
    pub entity_b: String,
    pub relationship_types: Vec<String>,
    pub positions: Vec<usize>,
}

impl RelationshipEdge {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.entity_a == a && self.entity_b == b) || (self.entity_a == b && self.entity_b == a)
    }
}

/// A relationship edge summarised for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub entity_a: String,
    pub entity_b: String,
    pub dominant_type: String,
    /// Occurrence count of the dominant type.
    pub strength: usize,
    /// Every type with its count, in first-insertion order.
    pub type_counts: Vec<(String, usize)>,
    pub positions: Vec<usize>,
}

impl Relationship {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.entity_a == a && self.entity_b == b) || (self.entity_a == b && self.entity_b == a)
    }

    pub fn involves(&self, name: &str) -> bool {
        self.entity_a == name || self.entity_b == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_connects_either_order() {
        let edge = RelationshipEdge {
            entity_a: "Tom".to_string(),
            entity_b: "Jerry".to_string(),
            relationship_types: vec!["associated with".to_string()],
            positions: vec![0],
        };
        assert!(edge.connects("Tom", "Jerry"));
        assert!(edge.connects("Jerry", "Tom"));
        assert!(!edge.connects("Tom", "Spike"));
        assert_eq!(edge.positions.len(), 1);
    }

    #[test]
    fn relationship_involves() {
        let rel = Relationship {
            entity_a: "Tom".to_string(),
            entity_b: "Jerry".to_string(),
            dominant_type: "associated with".to_string(),
            strength: 2,
            type_counts: vec![("associated with".to_string(), 2)],
            positions: vec![0, 30],
        };
        assert!(rel.involves("Jerry"));
        assert!(!rel.involves("Spike"));
        assert!(rel.connects("Jerry", "Tom"));
    }
}
