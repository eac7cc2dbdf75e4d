use crate::core::backoff::BackoffPolicy;
use crate::core::normalize::normalize;
use crate::domain::geo::GeoMapping;
use crate::domain::model::{KeywordRecord, RunOutcome, TrendWindow};
use crate::domain::ports::{KeywordStore, TrendSource};
use crate::utils::error::Result;
use rand::Rng;
use std::time::Duration;

/// Pause after every keyword, including the last one, whether or not the
/// provider throttled.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    pub cooldown: Duration,
    pub jitter_max: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(35),
            jitter_max: Duration::from_secs(15),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            cooldown: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    pub fn delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let jitter_ms = self.jitter_max.as_millis() as u64;
        self.cooldown + Duration::from_millis(rng.random_range(0..=jitter_ms))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub backoff: BackoffPolicy,
    pub pacing: Pacing,
    pub geo: GeoMapping,
    pub window: TrendWindow,
}

/// Sequential fetch, normalize and upsert loop over a sampled working set.
pub struct TrendSyncEngine<S: KeywordStore, T: TrendSource> {
    store: S,
    source: T,
    settings: RunSettings,
}

impl<S: KeywordStore, T: TrendSource> TrendSyncEngine<S, T> {
    pub fn new(store: S, source: T, settings: RunSettings) -> Self {
        Self {
            store,
            source,
            settings,
        }
    }

    /// Fails only when the working set cannot be listed. Per-keyword failures
    /// are counted in the outcome.
    pub async fn run(&self, working_set_size: usize) -> Result<RunOutcome> {
        tracing::info!("🚀 Selecting up to {} keywords", working_set_size);
        let keywords = self.store.list_keywords(working_set_size).await?;
        let total = keywords.len();
        tracing::info!("📋 {} keywords selected for this run", total);

        let mut outcome = RunOutcome::default();

        for (index, record) in keywords.iter().enumerate() {
            let geo = self.settings.geo.resolve(&record.country);
            tracing::info!("🔎 [{}/{}] {} ({})", index + 1, total, record.keyword, geo);
            outcome.keywords_attempted += 1;

            match self.sync_keyword(record, geo).await {
                Ok(written) => {
                    outcome.rows_written += written;
                }
                Err(e) => {
                    outcome.keywords_failed += 1;
                    tracing::error!(
                        keyword = %record.keyword,
                        kind = %e.kind(),
                        "❌ {} failed: {}",
                        record.keyword,
                        e
                    );
                }
            }

            let pause = self.settings.pacing.delay(&mut rand::rng());
            tracing::debug!("💤 Cooling down {:.1}s", pause.as_secs_f64());
            tokio::time::sleep(pause).await;
        }

        tracing::info!(
            "✅ Run complete: {} rows written, {} of {} keywords failed",
            outcome.rows_written,
            outcome.keywords_failed,
            outcome.keywords_attempted
        );
        Ok(outcome)
    }

    async fn sync_keyword(&self, record: &KeywordRecord, geo: &str) -> Result<usize> {
        let window = self.settings.window;
        let series = self
            .settings
            .backoff
            .with_retry(&record.keyword, || {
                self.source.fetch(&record.keyword, geo, window)
            })
            .await?;

        let rows = normalize(&record.keyword, &series);
        if rows.is_empty() {
            tracing::info!("📭 No data for {}", record.keyword);
            return Ok(0);
        }

        let written = self.store.upsert_rows(&rows).await?;
        tracing::info!("💾 {}: upserted {} rows", record.keyword, written);
        Ok(written)
    }

    /// Lists the working set with resolved geographies without querying the
    /// provider or writing anything.
    pub async fn plan(&self, working_set_size: usize) -> Result<Vec<(KeywordRecord, String)>> {
        let keywords = self.store.list_keywords(working_set_size).await?;
        Ok(keywords
            .into_iter()
            .map(|record| {
                let geo = self.settings.geo.resolve(&record.country).to_string();
                (record, geo)
            })
            .collect())
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }
}
