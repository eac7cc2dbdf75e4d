pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "trend-sync")]
#[command(about = "Sync search-interest time series for tracked keywords into Supabase")]
pub struct CliConfig {
    /// Number of keywords sampled for this run
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Optional TOML tuning file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// List the sampled keywords and their geographies without fetching or writing
    #[arg(long)]
    pub dry_run: bool,
}
