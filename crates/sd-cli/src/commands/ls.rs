//! List command implementation

use anyhow::{Context, Result};
use sd_resolve::DependencyStore;

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::context::ProjectContext;

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let store = DependencyStore::load(&ctx.cache_files()).context("Failed to load dependency caches")?;

    let routines: Vec<RoutineInfo> = store
        .routines()
        .iter()
        .map(|name| RoutineInfo {
            name: name.to_string(),
            object_type: store
                .script(name)
                .map(|s| s.object_type.dependency_type().to_string()),
            dependencies: store
                .dependencies(name)
                .unwrap_or_default()
                .iter()
                .map(|d| d.name.to_string())
                .collect(),
            has_script: store.script(name).is_some(),
        })
        .collect();

    match args.output {
        LsOutput::Table => print_table(&routines, store.script_count()),
        LsOutput::Json => print_json(&routines)?,
    }
    Ok(())
}

/// Routine information for display
#[derive(Debug, serde::Serialize)]
struct RoutineInfo {
    name: String,
    #[serde(rename = "type")]
    object_type: Option<String>,
    dependencies: Vec<String>,
    has_script: bool,
}

/// Print routines in table format
fn print_table(routines: &[RoutineInfo], script_count: usize) {
    let name_width = routines
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let type_width = 9;

    println!(
        "{:<name_width$}  {:<type_width$}  {:<6}  DEPENDS_ON",
        "NAME", "TYPE", "SCRIPT"
    );
    println!(
        "{:-<name_width$}  {:-<type_width$}  {:-<6}  {}",
        "",
        "",
        "",
        "-".repeat(40)
    );

    for routine in routines {
        let deps = if routine.dependencies.is_empty() {
            "-".to_string()
        } else {
            routine.dependencies.join(", ")
        };
        println!(
            "{:<name_width$}  {:<type_width$}  {:<6}  {}",
            routine.name,
            routine.object_type.as_deref().unwrap_or("-"),
            if routine.has_script { "yes" } else { "no" },
            deps
        );
    }

    println!();
    println!(
        "{} routines, {} create scripts cached",
        routines.len(),
        script_count
    );
}

/// Print routines in JSON format
fn print_json(routines: &[RoutineInfo]) -> Result<()> {
    let json = serde_json::to_string_pretty(routines).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
