//! Confidence fusion and tiering, run once per registry after every
//! section has been recorded.

use crate::schema::entity::{ConfidenceTier, Entity};

/// Multiplier when more than one strategy found the entity.
pub const MULTI_METHOD_BOOST: f64 = 1.2;
/// Per-mention growth factor when the entity was seen more than once.
pub const MENTION_BOOST: f64 = 0.1;

/// Entities split into tiers, each keeping first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Tiered {
    pub high: Vec<Entity>,
    pub medium: Vec<Entity>,
    pub low: Vec<Entity>,
}

impl Tiered {
    /// High, then medium, then low.
    pub fn concatenated(&self) -> Vec<Entity> {
        self.high
            .iter()
            .chain(&self.medium)
            .chain(&self.low)
            .cloned()
            .collect()
    }
}

/// Boosted, clamped confidence for an accumulated score.
pub fn boosted(confidence: f64, method_count: usize, mention_count: usize) -> f64 {
    let mut score = confidence;
    if method_count > 1 {
        score *= MULTI_METHOD_BOOST;
    }
    if mention_count > 1 {
        score *= 1.0 + mention_count as f64 * MENTION_BOOST;
    }
    score.clamp(0.0, 1.0)
}

/// Apply the boost to one entity and assign its tier.
pub fn finalize_entity(entity: &mut Entity) {
    entity.raw_confidence = entity.confidence;
    entity.confidence = boosted(
        entity.confidence,
        entity.detection_methods.len(),
        entity.mention_count(),
    );
    entity.tier = Some(ConfidenceTier::from_score(entity.confidence));
}

/// Finalize every entity and bucket them by tier.
pub fn classify(entities: Vec<Entity>) -> Tiered {
    let mut tiered = Tiered::default();
    for mut entity in entities {
        finalize_entity(&mut entity);
        match entity.tier {
            Some(ConfidenceTier::High) => tiered.high.push(entity),
            Some(ConfidenceTier::Medium) => tiered.medium.push(entity),
            _ => tiered.low.push(entity),
        }
    }
    tiered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::mention::{DetectionMethod, Mention};

    fn entity(name: &str, mentions: &[(DetectionMethod, f64)]) -> Entity {
        let mut e = Entity::new(name, name);
        for (i, (method, confidence)) in mentions.iter().enumerate() {
            e.absorb(Mention {
                surface_text: name.to_string(),
                position: i * 10,
                section_index: 0,
                detection_method: method.clone(),
                confidence: *confidence,
            });
        }
        e
    }

    #[test]
    fn single_weak_mention_stays_low() {
        let tiered = classify(vec![entity("They", &[(DetectionMethod::PluralPronoun, 0.3)])]);
        assert_eq!(tiered.low.len(), 1);
        assert_eq!(tiered.low[0].confidence, 0.3);
        assert_eq!(tiered.low[0].tier, Some(ConfidenceTier::Low));
    }

    #[test]
    fn repeated_weak_mentions_compound() {
        // 0.3 + 0.3 = 0.6, times 1.2 for two methods, times 1.2 for two mentions.
        let e = entity(
            "She",
            &[
                (DetectionMethod::PronounReference, 0.3),
                (DetectionMethod::PluralPronoun, 0.3),
            ],
        );
        let tiered = classify(vec![e]);
        assert_eq!(tiered.high.len(), 1);
        let she = &tiered.high[0];
        assert!((she.raw_confidence - 0.6).abs() < 1e-9);
        assert!((she.confidence - 0.864).abs() < 1e-9);
    }

    #[test]
    fn boost_is_clamped() {
        assert_eq!(boosted(1.0, 3, 5), 1.0);
        assert_eq!(boosted(0.2, 1, 1), 0.2);
        assert!((boosted(0.5, 2, 1) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn tiers_keep_first_seen_order() {
        let tiered = classify(vec![
            entity("Zed", &[(DetectionMethod::ProperName, 1.0)]),
            entity("It", &[(DetectionMethod::PronounReference, 0.5)]),
            entity("Amy", &[(DetectionMethod::ProperName, 1.0)]),
        ]);
        let high: Vec<&str> = tiered.high.iter().map(|e| e.canonical_name.as_str()).collect();
        assert_eq!(high, vec!["Zed", "Amy"]);
        assert_eq!(tiered.medium.len(), 1);
        assert_eq!(tiered.concatenated().len(), 3);
        assert_eq!(tiered.concatenated()[2].canonical_name, "It");
    }
}
