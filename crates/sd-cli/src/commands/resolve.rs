//! Resolve command implementation

use anyhow::{Context, Result};
use sd_core::ObjectName;
use sd_resolve::{format_summary, to_json, write_dependency_tree, DependencyStore, Resolver};

use crate::cli::{GlobalArgs, ResolveArgs, ResolveOutput};
use crate::context::ProjectContext;

/// Execute the resolve command
pub async fn execute(args: &ResolveArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let routine = ObjectName::parse(&args.routine)
        .with_context(|| format!("Invalid routine name: '{}'", args.routine))?
        .with_default_schema(ctx.config.effective_default_schema());

    let store = DependencyStore::load(&ctx.cache_files()).context("Failed to load dependency caches")?;
    let resolver = Resolver::new(store, ctx.config.effective_default_schema());
    let records = resolver.resolve_routine(&routine)?;

    match args.output {
        ResolveOutput::Json => println!("{}", to_json(&records)?),
        ResolveOutput::Summary => {
            println!("Dependencies of {routine}:");
            print!("{}", format_summary(&records));
        }
    }

    if !args.no_write {
        let path = write_dependency_tree(
            &ctx.config.analysis_dir_absolute(&ctx.root),
            &routine,
            &records,
        )?;
        if args.output == ResolveOutput::Summary {
            println!();
            println!("Dependency tree written to {}", path.display());
        }
    }
    Ok(())
}
