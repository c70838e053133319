use anyhow::Context;
use std::path::Path;
use vibe_core::{catalog::Catalog, io, paths, store::Store};

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing /vibe badge tracking in: {}", root.display());

    let dir = paths::vibe_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    if paths::catalog_path(root).exists() {
        println!("  exists:  {}", paths::CATALOG_FILE);
    } else {
        Catalog::default_catalog()
            .save(root)
            .context("failed to write catalog.yaml")?;
        println!("  created: {}", paths::CATALOG_FILE);
    }

    if paths::store_path(root).exists() {
        println!("  exists:  {}", paths::STORE_FILE);
    } else {
        Store::new()
            .flush(root)
            .context("failed to write store.json")?;
        println!("  created: {}", paths::STORE_FILE);
    }

    Ok(())
}
