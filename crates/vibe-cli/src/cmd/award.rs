use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use vibe_core::{
    catalog::Catalog, celebrate::CelebrationFormatter, evaluate::Evaluator, handle, store::Store,
};

pub fn run(root: &Path, raw_handle: &str, badge_id: &str, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_default(root).context("failed to load catalog")?;
    let mut store = Store::load(root);

    let evaluator = Evaluator::new(&catalog);
    let awarded = evaluator.award(&mut store, raw_handle, badge_id)?;
    let handle = handle::normalize(raw_handle)?;

    let Some(badge) = awarded else {
        if json {
            return print_json(&serde_json::json!({
                "handle": handle,
                "badge_id": badge_id,
                "awarded": false,
            }));
        }
        println!("{handle} already has '{badge_id}'.");
        return Ok(());
    };

    store.flush(root).context("failed to save store")?;

    if json {
        return print_json(&serde_json::json!({
            "handle": handle,
            "badge_id": badge.id,
            "awarded": true,
        }));
    }

    println!("Awarded {} {} to {handle}.", badge.emoji, badge.name);
    if let Some(c) = CelebrationFormatter::new().format(&handle, std::slice::from_ref(&badge)) {
        println!("DM: {}", c.dm_message);
    }
    Ok(())
}
