//! Lexicon Linter — validates a lexicon file before it is handed to the
//! detector.
//!
//! Usage: lexicon_linter <lexicon.ron> [--standalone]
//!
//! By default the file is checked as an overlay on the built-in lexicon;
//! `--standalone` checks it on its own, so every list must be filled.

use narrative_cast::core::patterns::CompiledLexicon;
use narrative_cast::Lexicon;
use rustc_hash::FxHashSet;
use std::path::Path;
use std::process;

/// Lists whose entries are expected to appear in other lists too.
const SHARED_LISTS: &[(&str, &str)] = &[
    ("pronouns", "plural_pronouns"),
    ("pronouns", "formation_pronouns"),
    ("plural_pronouns", "formation_pronouns"),
    ("pronouns", "stopwords"),
    ("animal_terms", "description_nouns"),
    ("collective_terms", "formation_nouns"),
    ("collective_determiners", "role_determiners"),
    ("stopwords", "collective_determiners"),
    ("stopwords", "role_determiners"),
    ("speech_verbs", "emotion_verbs"),
    ("titles", "occupations"),
    ("titles", "physical_attributes"),
    ("titles", "personality_traits"),
    ("titles", "stopwords"),
];

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: lexicon_linter <lexicon.ron> [--standalone]");
        process::exit(0);
    }

    let path = Path::new(&args[1]);
    let standalone = args[2..].iter().any(|a| a == "--standalone");

    let raw = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to read '{}': {}", path.display(), e);
        process::exit(1);
    });

    // Duplicates are only visible before parsing normalizes them away.
    let mut warnings = duplicate_warnings(&raw);

    let overlay = Lexicon::parse_ron(&raw).unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to parse lexicon: {}", e);
        process::exit(1);
    });

    let lexicon = if standalone {
        overlay
    } else {
        let mut base = Lexicon::builtin();
        base.merge(overlay);
        base
    };

    let mut errors = Vec::new();
    for (name, list) in lexicon.lists() {
        if list.is_empty() {
            errors.push(format!("list '{}' is empty", name));
        }
    }
    warnings.extend(overlap_warnings(&lexicon));

    if let Err(e) = CompiledLexicon::compile(lexicon.clone()) {
        errors.push(format!("patterns do not compile: {}", e));
    }

    println!("\n=== Lexicon Lint Report ===\n");

    let total: usize = lexicon.lists().iter().map(|(_, l)| l.len()).sum();
    println!("Loaded {} entries across {} lists", total, lexicon.lists().len());

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

/// Entries repeated within one list of the raw file (case-insensitive).
fn duplicate_warnings(raw: &str) -> Vec<String> {
    let Ok(unnormalized) = ron::from_str::<Lexicon>(raw) else {
        return Vec::new();
    };
    let mut warnings = Vec::new();
    for (name, list) in unnormalized.lists() {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        for entry in list {
            let key = entry.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
            if !seen.insert(key.clone()) {
                warnings.push(format!("list '{}' repeats '{}'", name, key));
            }
        }
    }
    warnings
}

/// Entries shared by two lists that are not expected to overlap.
fn overlap_warnings(lexicon: &Lexicon) -> Vec<String> {
    let lists = lexicon.lists();
    let mut warnings = Vec::new();
    for (i, (a_name, a_list)) in lists.iter().enumerate() {
        for (b_name, b_list) in &lists[i + 1..] {
            if expected_overlap(a_name, b_name) {
                continue;
            }
            for entry in a_list.iter() {
                if b_list.contains(entry) {
                    warnings.push(format!(
                        "'{}' appears in both '{}' and '{}'",
                        entry, a_name, b_name
                    ));
                }
            }
        }
    }
    warnings
}

fn expected_overlap(a: &str, b: &str) -> bool {
    SHARED_LISTS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}
