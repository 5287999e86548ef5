//! Pluggable detection strategies.
//!
//! A strategy looks at one section and returns candidates with absolute
//! positions. Strategies are pure: they never see the registries, so they
//! can run in any order or in parallel.

use crate::core::patterns::CompiledLexicon;
use crate::schema::mention::DetectionMethod;
use crate::schema::section::Section;

/// One piece of evidence produced by a strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Character {
        surface: String,
        position: usize,
        method: DetectionMethod,
        confidence: f64,
    },
    Collective {
        surface: String,
        position: usize,
        method: DetectionMethod,
        confidence: f64,
    },
    Relationship {
        a: String,
        b: String,
        rel_type: String,
        position: usize,
    },
}

impl Candidate {
    pub fn character(surface: impl Into<String>, position: usize, method: DetectionMethod) -> Self {
        Candidate::Character {
            surface: surface.into(),
            position,
            method,
            confidence: 1.0,
        }
    }

    pub fn collective(surface: impl Into<String>, position: usize, method: DetectionMethod) -> Self {
        Candidate::Collective {
            surface: surface.into(),
            position,
            method,
            confidence: 1.0,
        }
    }

    pub fn relationship(
        a: impl Into<String>,
        b: impl Into<String>,
        rel_type: impl Into<String>,
        position: usize,
    ) -> Self {
        Candidate::Relationship {
            a: a.into(),
            b: b.into(),
            rel_type: rel_type.into(),
            position,
        }
    }

    /// Override the default confidence of 1.0. No-op for relationships.
    pub fn with_confidence(mut self, value: f64) -> Self {
        match &mut self {
            Candidate::Character { confidence, .. } | Candidate::Collective { confidence, .. } => {
                *confidence = value;
            }
            Candidate::Relationship { .. } => {}
        }
        self
    }

    pub fn position(&self) -> usize {
        match self {
            Candidate::Character { position, .. }
            | Candidate::Collective { position, .. }
            | Candidate::Relationship { position, .. } => *position,
        }
    }

    pub fn method(&self) -> Option<&DetectionMethod> {
        match self {
            Candidate::Character { method, .. } | Candidate::Collective { method, .. } => {
                Some(method)
            }
            Candidate::Relationship { .. } => None,
        }
    }
}

/// A single detection pass over one section.
pub trait Strategy: Send + Sync {
    /// Stable name, used to disable the strategy from the builder.
    fn name(&self) -> &'static str;

    fn detect(&self, section: &Section<'_>, lexicon: &CompiledLexicon) -> Vec<Candidate>;
}

/// Every unordered pair of `names`, in order of appearance, as
/// relationship candidates of one type.
pub fn pairwise(names: &[String], rel_type: &str, position: usize) -> Vec<Candidate> {
    let mut out = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            out.push(Candidate::relationship(a.clone(), b.clone(), rel_type, position));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairwise_covers_every_pair_once() {
        let names: Vec<String> = ["Tom", "Jerry", "Spike"].iter().map(|s| s.to_string()).collect();
        let pairs = pairwise(&names, "associated with", 7);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|c| c.position() == 7 && c.method().is_none()));
        assert!(pairwise(&names[..1], "associated with", 0).is_empty());
    }

    #[test]
    fn confidence_override() {
        let c = Candidate::collective("they", 3, DetectionMethod::PluralPronoun).with_confidence(0.3);
        match c {
            Candidate::Collective { confidence, .. } => assert_eq!(confidence, 0.3),
            other => panic!("unexpected candidate {other:?}"),
        }
    }
}
