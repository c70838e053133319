use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use vibe_core::{catalog::Catalog, leaderboard, store::Store};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_default(root).context("failed to load catalog")?;
    let store = Store::load(root);

    let board = leaderboard::leaderboard(&catalog, &store);

    if json {
        return print_json(&board);
    }

    if board.is_empty() {
        println!("No badges awarded yet.");
        return Ok(());
    }

    println!("🏅 Badge leaderboard:\n");
    let rows: Vec<Vec<String>> = board
        .iter()
        .enumerate()
        .map(|(i, e)| {
            vec![
                (i + 1).to_string(),
                e.handle.clone(),
                e.points.to_string(),
                e.badges.to_string(),
                e.latest_badge.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["#", "HANDLE", "POINTS", "BADGES", "LATEST"], rows);
    Ok(())
}
