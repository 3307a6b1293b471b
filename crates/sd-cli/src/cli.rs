//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use sd_core::Backend;

/// sqldeps - Resolve the dependency tree of SQL routines
#[derive(Parser, Debug)]
#[command(name = "sqldeps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the catalog and write the dependency caches
    Discover(DiscoverArgs),

    /// Write comment-free routine definitions to the raw SQL directory
    Extract(ExtractArgs),

    /// Resolve the dependency tree of one routine from the caches
    Resolve(ResolveArgs),

    /// List routines in the dependency cache
    Ls(LsArgs),
}

/// Catalog connection options
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Catalog backend (default: from config)
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendArg>,

    /// ADO connection string for SQL Server, database path for DuckDB
    #[arg(long, env = "CONNECTION_STRING", hide_env_values = true)]
    pub connection: Option<String>,
}

/// Backend names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    /// Microsoft SQL Server
    Sqlserver,
    /// DuckDB database file
    Duckdb,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sqlserver => Backend::SqlServer,
            BackendArg::Duckdb => Backend::DuckDb,
        }
    }
}

/// Arguments for the discover command
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Routine names to extract (comma-separated, default: all)
    #[arg(short, long)]
    pub routines: Option<String>,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Routine to resolve (`schema.name`)
    pub routine: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: ResolveOutput,

    /// Print only, do not write the dependency tree file
    #[arg(long)]
    pub no_write: bool,
}

/// Resolve output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutput {
    /// Pretty JSON dependency tree
    Json,
    /// One line per dependency
    Summary,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,
}

/// List output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
