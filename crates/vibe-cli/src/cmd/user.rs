use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use vibe_core::{
    catalog::Catalog,
    evaluate::Evaluator,
    handle,
    leaderboard::rank_for_points,
    store::Store,
};

pub fn run(root: &Path, raw_handle: &str, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_default(root).context("failed to load catalog")?;
    let store = Store::load(root);
    let handle = handle::normalize(raw_handle)?;

    let record = store.get(&handle);
    let points: u32 = record
        .earned_badge_ids
        .iter()
        .filter_map(|id| catalog.get(id))
        .map(|b| b.rarity.points())
        .sum();

    let evaluator = Evaluator::new(&catalog);
    let next = evaluator.next_badges(&record);

    if json {
        return print_json(&serde_json::json!({
            "handle": handle,
            "current_streak": record.current_streak,
            "best_streak": record.best_streak,
            "counters": record.counters,
            "earned_badge_ids": record.earned_badge_ids,
            "points": points,
            "rank": rank_for_points(points),
            "next_badges": next,
        }));
    }

    println!("User: {handle}");
    println!("Rank: {} ({points} points)", rank_for_points(points));
    println!(
        "Streak: {} days (best: {})",
        record.current_streak, record.best_streak
    );

    if record.earned_badge_ids.is_empty() {
        println!("\nNo badges yet.");
    } else {
        println!("\nBadges ({}):", record.earned_badge_ids.len());
        let rows: Vec<Vec<String>> = record
            .earned_badge_ids
            .iter()
            .map(|id| match catalog.get(id) {
                Some(b) => vec![
                    format!("{} {}", b.emoji, b.name),
                    b.rarity.to_string(),
                    b.description.clone(),
                ],
                None => vec![id.clone(), "?".to_string(), "(not in catalog)".to_string()],
            })
            .collect();
        print_table(&["BADGE", "RARITY", "DESCRIPTION"], rows);
    }

    if !next.is_empty() {
        println!("\nNext up:");
        for n in next.iter().take(3) {
            println!(
                "  {} {} - {} to go ({}%)",
                n.definition.emoji, n.definition.name, n.remaining, n.progress_pct
            );
        }
    }
    Ok(())
}
