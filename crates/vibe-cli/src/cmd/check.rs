use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use vibe_core::{
    catalog::{Catalog, STREAK_METRIC},
    celebrate::CelebrationFormatter,
    evaluate::Evaluator,
    handle,
    store::{Metrics, Store},
};

pub fn run(
    root: &Path,
    raw_handle: &str,
    streak: Option<u32>,
    counters: &[String],
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let metrics = build_metrics(streak, counters)?;
    if metrics.is_empty() {
        anyhow::bail!("nothing to check: pass --streak and/or --counter name=value");
    }

    let catalog = Catalog::load_or_default(root).context("failed to load catalog")?;
    let mut store = Store::load(root);

    let evaluator = Evaluator::new(&catalog);
    let newly_earned = evaluator.evaluate(&mut store, raw_handle, &metrics)?;
    store.flush(root).context("failed to save store")?;

    let handle = handle::normalize(raw_handle)?;
    let mut formatter = match seed {
        Some(s) => CelebrationFormatter::seeded(s),
        None => CelebrationFormatter::new(),
    };
    let celebration = formatter.format(&handle, &newly_earned);

    if json {
        let badges: Vec<&str> = newly_earned.iter().map(|b| b.id.as_str()).collect();
        return print_json(&serde_json::json!({
            "handle": handle,
            "newly_earned": badges,
            "celebration": celebration,
        }));
    }

    if newly_earned.is_empty() {
        println!("No new badges for {handle}.");
        return Ok(());
    }

    println!(
        "{handle} earned {} new badge{}:",
        newly_earned.len(),
        if newly_earned.len() == 1 { "" } else { "s" }
    );
    for badge in &newly_earned {
        println!("  {} {} ({})", badge.emoji, badge.name, badge.rarity);
    }

    if let Some(c) = celebration {
        println!("\nDM: {}", c.dm_message);
        if c.should_announce_publicly {
            println!("Announce to the board: yes");
        } else {
            println!("Announce to the board: no (private celebration)");
        }
    }
    Ok(())
}

fn build_metrics(streak: Option<u32>, counters: &[String]) -> anyhow::Result<Metrics> {
    let mut metrics = Metrics::new();
    if let Some(s) = streak {
        metrics.insert(STREAK_METRIC.to_string(), i64::from(s));
    }
    for pair in counters {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("invalid --counter '{pair}': expected name=value"))?;
        let value: i64 = value
            .parse()
            .with_context(|| format!("invalid --counter value in '{pair}'"))?;
        metrics.insert(name.trim().to_string(), value);
    }
    Ok(metrics)
}
