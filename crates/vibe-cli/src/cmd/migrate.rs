use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use vibe_core::{migrate, store::Store};

pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&data)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;

    let mut store = Store::load(root);
    let summary = migrate::import_value(&mut store, &value)
        .with_context(|| format!("failed to import {}", file.display()))?;
    store.flush(root).context("failed to save store")?;

    if json {
        return print_json(&summary);
    }

    println!("Imported {}:", file.display());
    println!("  users:   {}", summary.users);
    println!("  badges:  {}", summary.badges);
    println!("  streaks: {}", summary.streaks);
    if summary.skipped > 0 {
        println!("  skipped: {} (unusable handles)", summary.skipped);
    }
    Ok(())
}
