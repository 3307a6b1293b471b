//! Extract command implementation

use anyhow::{Context, Result};
use sd_core::ObjectName;
use sd_discover::ExtractTargets;

use crate::cli::{ExtractArgs, GlobalArgs};
use crate::context::ProjectContext;

/// Execute the extract command
pub async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let selection = parse_selection(args.routines.as_deref())?;
    let catalog = ctx.open_catalog(&args.connection).await?;

    let targets = ExtractTargets {
        sql_raw_dir: ctx.config.sql_raw_dir_absolute(&ctx.root),
        analysis_dir: ctx.config.analysis_dir_absolute(&ctx.root),
    };
    let extracted = sd_discover::extract_routines(catalog.as_ref(), &ctx.filter(), &selection, &targets)
        .await
        .context("Extraction failed")?;

    if global.verbose {
        for routine in &extracted {
            println!("  {} -> {}", routine.name, routine.path.display());
        }
    }
    println!(
        "Extracted {} routine{} to {}",
        extracted.len(),
        if extracted.len() == 1 { "" } else { "s" },
        targets.sql_raw_dir.display()
    );
    Ok(())
}

/// Split a comma-separated routine list.
fn parse_selection(routines: Option<&str>) -> Result<Vec<ObjectName>> {
    let Some(routines) = routines else {
        return Ok(Vec::new());
    };
    routines
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ObjectName::parse(s).with_context(|| format!("Invalid routine name: '{s}'")))
        .collect()
}
