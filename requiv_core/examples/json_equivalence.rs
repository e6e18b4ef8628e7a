//! JSON document equivalency example.
//!
//! Loads two JSON files and checks that the first one (the subject) is
//! structurally equivalent to the second one (the expectation), using the
//! options from `requiv.toml` when one is found.
//!
//! Usage:
//!   cargo run --example json_equivalence -- actual.json expected.json

use anyhow::{bail, Context};
use requiv_common::{load_config, Value};
use requiv_core::{Equivalency, EquivalencyOptions};
use std::env;
use std::fs;
use std::path::Path;

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Value::from(json))
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <subject.json> <expectation.json>", args[0]);
        std::process::exit(1);
    }

    let subject_path = Path::new(&args[1]);
    let expectation_path = Path::new(&args[2]);

    let loaded = load_config()?;
    if loaded.exists {
        println!("Using options from {}", loaded.path.display());
    }
    let options = EquivalencyOptions::from_config(&loaded.config)?;

    println!("requiv - JSON Equivalency");
    println!("=========================");
    println!("Subject:     {}", subject_path.display());
    println!("Expectation: {}", expectation_path.display());
    println!();

    let subject = read_json(subject_path)?;
    let expectation = read_json(expectation_path)?;

    let report = Equivalency::new().check(&subject, &expectation, &options)?;

    if report.succeeded {
        println!("Documents are equivalent.");
        return Ok(());
    }

    println!("Found {} difference(s):", report.failures.len());
    for failure in &report.failures {
        println!("  - {}", failure);
    }

    if env::var_os("REQUIV_JSON_REPORT").is_some() {
        println!();
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    bail!("{} is not equivalent to {}", subject_path.display(), expectation_path.display())
}
