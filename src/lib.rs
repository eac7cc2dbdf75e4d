pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GoogleTrendsClient, SupabaseStore};
pub use config::{env::StoreCredentials, toml_config::TrendSyncConfig};
pub use core::engine::{Pacing, RunSettings, TrendSyncEngine};
pub use utils::error::{Result, TrendSyncError};
