//! Discover command implementation

use anyhow::{Context, Result};

use crate::cli::{DiscoverArgs, GlobalArgs};
use crate::context::ProjectContext;

/// Execute the discover command
pub async fn execute(args: &DiscoverArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let catalog = ctx.open_catalog(&args.connection).await?;

    let output = sd_discover::discover(catalog.as_ref(), &ctx.filter())
        .await
        .context("Discovery failed")?;

    let cache = ctx.cache_files();
    output.write(&cache).context("Failed to write dependency caches")?;

    let dependency_count: usize = output.procedures.iter().map(|p| p.dependencies.len()).sum();
    println!(
        "Discovered {} routines ({} dependencies) and {} create scripts",
        output.procedures.len(),
        dependency_count,
        output.scripts.len()
    );
    println!("  Caches written to {}", cache.dir().display());
    Ok(())
}
