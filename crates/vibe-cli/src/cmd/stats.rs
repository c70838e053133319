use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use vibe_core::{catalog::Catalog, leaderboard, store::Store};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_default(root).context("failed to load catalog")?;
    let store = Store::load(root);

    let stats = leaderboard::stats(&catalog, &store);

    if json {
        return print_json(&stats);
    }

    println!("📊 Badge statistics:");
    println!("  Badge types:    {}", stats.badges_available);
    println!("  Badges awarded: {}", stats.badges_awarded);
    println!("  Users tracked:  {}", stats.users_tracked);
    println!("  Badge earners:  {}", stats.unique_earners);

    println!("\n  Catalog by rarity:");
    for (rarity, count) in &stats.rarity_distribution {
        println!("    {rarity:<10} {count}");
    }

    if !stats.recent.is_empty() {
        println!("\n  Recent celebrations:");
        for c in &stats.recent {
            println!("    {} → {}", c.handle, c.badge_id);
        }
    }
    Ok(())
}
