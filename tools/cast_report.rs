//! Cast Report — runs detection over a text file and prints the cast.
//!
//! Usage: cast_report <file.txt> [--lexicon <file.ron>]... [--window <bytes>] [--json]
//!
//! Set `RUST_LOG=narrative_cast=debug` to see per-run diagnostics on stderr.

use narrative_cast::schema::entity::Entity;
use narrative_cast::schema::report::DetectionReport;
use narrative_cast::CastDetector;
use std::process;

const USAGE: &str =
    "Usage: cast_report <file.txt> [--lexicon <file.ron>]... [--window <bytes>] [--json]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut input = None;
    let mut lexicons = Vec::new();
    let mut window = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lexicon" => {
                i += 1;
                lexicons.push(required_value(&args, i, "--lexicon"));
            }
            "--window" => {
                i += 1;
                let raw = required_value(&args, i, "--window");
                window = Some(raw.parse::<usize>().unwrap_or_else(|_| {
                    eprintln!("Error: --window must be a byte count");
                    process::exit(1);
                }));
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
            path => input = Some(path.to_string()),
        }
        i += 1;
    }

    let input_path = input.unwrap_or_else(|| {
        eprintln!("Error: an input file is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let text = std::fs::read_to_string(&input_path).unwrap_or_else(|e| {
        eprintln!("Error reading input file '{}': {}", input_path, e);
        process::exit(1);
    });

    let mut builder = CastDetector::builder();
    for path in &lexicons {
        builder = builder.lexicon(path);
    }
    if let Some(bytes) = window {
        builder = builder.context_window(bytes);
    }
    let detector = builder.build().unwrap_or_else(|e| {
        eprintln!("Error building detector: {}", e);
        process::exit(1);
    });

    let report = detector.detect(&text).unwrap_or_else(|e| {
        eprintln!("Error analysing '{}': {}", input_path, e);
        process::exit(1);
    });

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_summary(&input_path, &report);
    }
}

fn required_value(args: &[String], i: usize, flag: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("Error: {} needs a value", flag);
        process::exit(1);
    })
}

fn print_summary(path: &str, report: &DetectionReport) {
    println!("=== Cast of '{}' ({} sections) ===", path, report.sections.len());

    println!("\nCharacters:");
    print_tier("high", &report.high_confidence);
    print_tier("medium", &report.medium_confidence);
    print_tier("low", &report.low_confidence);

    println!("\nCollectives:");
    print_tier("high", &report.collective_high_confidence);
    print_tier("medium", &report.collective_medium_confidence);
    print_tier("low", &report.collective_low_confidence);

    if !report.relationships.is_empty() {
        println!("\nRelationships:");
        for rel in &report.relationships {
            println!(
                "  {} <-> {}: {} (x{})",
                rel.entity_a, rel.entity_b, rel.dominant_type, rel.strength
            );
        }
    }

    if !report.transitions.textual.is_empty() {
        println!("\nGroup transitions:");
        for t in &report.transitions.textual {
            println!(
                "  {} at {}: {}",
                t.collective_name,
                t.position,
                t.member_candidate_names.join(", ")
            );
        }
    }

    println!(
        "\nSummary: {} characters, {} collectives, {} relationships, {} positional transitions",
        report.characters.len(),
        report.collectives.len(),
        report.relationships.len(),
        report.transitions.positional.len()
    );
}

fn print_tier(label: &str, entities: &[Entity]) {
    if entities.is_empty() {
        return;
    }
    println!("  [{}]", label);
    for entity in entities {
        let mut methods: Vec<String> = entity
            .detection_methods
            .iter()
            .map(|m| m.label())
            .collect();
        methods.sort();
        let kind = match entity.character_kind {
            Some(kind) => format!(" {:?}", kind).to_lowercase(),
            None => String::new(),
        };
        println!(
            "    {:<24} {:.2}{} x{} [{}]",
            entity.canonical_name,
            entity.confidence,
            kind,
            entity.mention_count(),
            methods.join(", ")
        );
    }
}
