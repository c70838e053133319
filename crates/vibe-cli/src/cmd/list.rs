use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use vibe_core::catalog::{Catalog, Criteria, SpecialCondition};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_default(root).context("failed to load catalog")?;

    if json {
        let items: Vec<serde_json::Value> = catalog
            .iter()
            .map(|b| {
                serde_json::json!({
                    "id": b.id,
                    "name": b.name,
                    "emoji": b.emoji,
                    "rarity": b.rarity,
                    "criteria": b.criteria,
                    "celebrate_publicly": b.celebrate_publicly,
                })
            })
            .collect();
        return print_json(&items);
    }

    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|b| {
            vec![
                b.id.clone(),
                format!("{} {}", b.emoji, b.name),
                b.rarity.to_string(),
                criteria_label(&b.criteria),
                if b.celebrate_publicly { "board" } else { "dm" }.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "RARITY", "EARNED BY", "CELEBRATION"], rows);
    Ok(())
}

fn criteria_label(criteria: &Criteria) -> String {
    match criteria {
        Criteria::Threshold { metric, threshold } => format!("{metric} >= {threshold}"),
        Criteria::Special { condition } => match condition {
            SpecialCondition::Comeback => "comeback after a break".to_string(),
        },
    }
}
