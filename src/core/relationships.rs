//! Relationship graph: one undirected edge per unordered pair of
//! canonical names, accumulating typed evidence.

use rustc_hash::FxHashMap;

use crate::core::normalize::canonicalize;
use crate::schema::relationship::{Relationship, RelationshipEdge};

#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    index: FxHashMap<(String, String), usize>,
    edges: Vec<RelationshipEdge>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one piece of evidence between `a` and `b`. Self-edges and empty
    /// names are ignored. Returns false when nothing was recorded.
    pub fn record(&mut self, a: &str, b: &str, rel_type: &str, position: usize) -> bool {
        let a = canonicalize(a);
        let b = canonicalize(b);
        if a.is_empty() || b.is_empty() || a == b {
            return false;
        }

        let slot = match self.find(&a, &b) {
            Some(slot) => slot,
            None => {
                self.edges.push(RelationshipEdge {
                    entity_a: a.clone(),
                    entity_b: b.clone(),
                    relationship_types: Vec::new(),
                    positions: Vec::new(),
                });
                self.index.insert((a, b), self.edges.len() - 1);
                self.edges.len() - 1
            }
        };
        let edge = &mut self.edges[slot];
        edge.relationship_types.push(rel_type.to_string());
        edge.positions.push(position);
        true
    }

    /// Look up an edge by canonical names, in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<&RelationshipEdge> {
        self.find(a, b).map(|i| &self.edges[i])
    }

    fn find(&self, a: &str, b: &str) -> Option<usize> {
        self.index
            .get(&(a.to_string(), b.to_string()))
            .or_else(|| self.index.get(&(b.to_string(), a.to_string())))
            .copied()
    }

    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Summarise every edge, in edge creation order.
    pub fn summarize(&self) -> Vec<Relationship> {
        self.edges.iter().map(summarize_edge).collect()
    }
}

/// Tally types in first-insertion order and pick the most frequent one.
/// Ties go to the type seen first.
pub fn summarize_edge(edge: &RelationshipEdge) -> Relationship {
    let mut type_counts: Vec<(String, usize)> = Vec::new();
    for rel_type in &edge.relationship_types {
        match type_counts.iter_mut().find(|(t, _)| t == rel_type) {
            Some((_, count)) => *count += 1,
            None => type_counts.push((rel_type.clone(), 1)),
        }
    }

    let mut dominant: Option<&(String, usize)> = None;
    for entry in &type_counts {
        if dominant.map_or(true, |best| entry.1 > best.1) {
            dominant = Some(entry);
        }
    }
    let (dominant_type, strength) = dominant
        .map(|(t, c)| (t.clone(), *c))
        .unwrap_or_default();

    Relationship {
        entity_a: edge.entity_a.clone(),
        entity_b: edge.entity_b.clone(),
        dominant_type,
        strength,
        type_counts,
        positions: edge.positions.clone(),
    }
}
