use crate::output::{print_json, print_table};
use std::path::Path;
use vibe_core::store::Store;

pub fn run(root: &Path, limit: usize, json: bool) -> anyhow::Result<()> {
    let store = Store::load(root);

    let entries: Vec<_> = store
        .celebration_log()
        .iter()
        .rev()
        .take(limit)
        .cloned()
        .collect();

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No celebrations yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|c| {
            vec![
                c.earned_at.format("%Y-%m-%d %H:%M").to_string(),
                c.handle.clone(),
                c.badge_id.clone(),
                c.metric_value.to_string(),
            ]
        })
        .collect();
    print_table(&["EARNED AT", "HANDLE", "BADGE", "VALUE"], rows);
    Ok(())
}
