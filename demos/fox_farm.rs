/// Fox Farm demo — runs detection over a short farm story and prints the
/// cast, the relationship graph and the group transitions.
///
/// Run with: cargo run --example fox_farm

use narrative_cast::schema::entity::ConfidenceTier;
use narrative_cast::CastDetector;

const STORY: &str = "\
My father raised silver foxes in pens behind the barn. Every fall he killed \
them and sold the pelts to the traders in town.

My brother Laird and I sat on the top step and watched. Henry Bailey, the \
hired man, swung the sack at me. \"Christmas present!\" said Henry. Mother \
thought that was not funny.

A fox named Flora slipped out of her pen one night. Laird and Henry chased \
her together across the field, and by morning they formed a team. The dogs \
barked in unison at the gate.";

fn main() {
    let detector = CastDetector::builder()
        .build()
        .expect("Failed to build detector");

    let report = detector.detect(STORY).expect("Detection failed");

    println!("=== Fox Farm: {} sections ===\n", report.sections.len());

    // --- Characters, by tier ---
    for tier in [ConfidenceTier::High, ConfidenceTier::Medium, ConfidenceTier::Low] {
        let characters = report.characters_in_tier(tier);
        if characters.is_empty() {
            continue;
        }
        println!("[{} confidence characters]", tier.name());
        for c in characters {
            let kind = c
                .character_kind
                .map(|k| format!("{:?}", k).to_lowercase())
                .unwrap_or_default();
            println!(
                "  {:<16} {:.2} {:<6} sections {:?}",
                c.canonical_name, c.confidence, kind, c.section_indices
            );
        }
    }

    // --- Collectives ---
    println!("\n[collectives]");
    for group in &report.collectives {
        let mut methods: Vec<String> = group.detection_methods.iter().map(|m| m.label()).collect();
        methods.sort();
        println!("  {:<16} {:.2} ({})", group.canonical_name, group.confidence, methods.join("; "));
    }

    // --- Relationships ---
    println!("\n[relationships]");
    for rel in &report.relationships {
        println!(
            "  {} <-> {}: {} (x{})",
            rel.entity_a, rel.entity_b, rel.dominant_type, rel.strength
        );
    }

    // --- Who joined which group ---
    println!("\n[transitions]");
    for t in &report.transitions.textual {
        println!("  named in '{}': {}", t.collective_name, t.member_candidate_names.join(", "));
    }
    for t in &report.transitions.positional {
        println!(
            "  before '{}' at {}: {}",
            t.collective_name,
            t.position,
            t.member_candidate_names.join(", ")
        );
    }
}
