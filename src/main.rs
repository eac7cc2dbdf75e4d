use anyhow::Context;
use clap::Parser;
use trend_sync::utils::{error::TrendSyncError, logger, validation::Validate};
use trend_sync::{
    CliConfig, GoogleTrendsClient, StoreCredentials, SupabaseStore, TrendSyncConfig,
    TrendSyncEngine,
};

fn exit_with(stage: &str, e: &TrendSyncError) -> ! {
    tracing::error!("❌ {} failed: {} (kind: {})", stage, e, e.kind());
    eprintln!("❌ {}: {}", stage, e);
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting trend-sync");
    tracing::debug!("CLI args: {:?}", args);

    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TrendSyncConfig::from_file(path).unwrap_or_else(|e| exit_with("Loading config", &e))
        }
        None => TrendSyncConfig::default(),
    };

    if let Err(e) = config.validate() {
        exit_with("Configuration validation", &e);
    }

    let credentials =
        StoreCredentials::from_env().unwrap_or_else(|e| exit_with("Reading credentials", &e));

    let store = SupabaseStore::new(credentials, &config.store)
        .context("failed to build the store HTTP client")?;
    let source = GoogleTrendsClient::new(&config.provider)
        .context("failed to build the provider HTTP client")?;
    let engine = TrendSyncEngine::new(store, source, config.run_settings());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no provider queries or writes");
        let plan = engine
            .plan(args.limit)
            .await
            .unwrap_or_else(|e| exit_with("Listing keywords", &e));
        for (index, (record, geo)) in plan.iter().enumerate() {
            println!("[{}/{}] {} ({})", index + 1, plan.len(), record.keyword, geo);
        }
        return Ok(());
    }

    match engine.run(args.limit).await {
        Ok(outcome) => {
            println!(
                "✅ Done: {} rows written, {} of {} keywords failed",
                outcome.rows_written, outcome.keywords_failed, outcome.keywords_attempted
            );
        }
        Err(e) => exit_with("Listing keywords", &e),
    }

    Ok(())
}
