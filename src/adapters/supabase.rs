use crate::config::env::StoreCredentials;
use crate::config::toml_config::StoreConfig;
use crate::domain::model::{KeywordRecord, TrendRow};
use crate::domain::ports::KeywordStore;
use crate::domain::services::{dedupe_rows, select_working_set};
use crate::utils::error::{Result, TrendSyncError};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::sync::Mutex;
use std::time::Duration;

const KEYWORD_COLUMNS: &str = "keyword,topic,country";
const CONFLICT_KEY: &str = "keyword,date";
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";

/// PostgREST gateway for the keywords and trends tables.
pub struct SupabaseStore {
    client: Client,
    credentials: StoreCredentials,
    keywords_table: String,
    trends_table: String,
    pool_size: usize,
    rng: Mutex<StdRng>,
}

impl SupabaseStore {
    pub fn new(credentials: StoreCredentials, config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            credentials,
            keywords_table: config.keywords_table.clone(),
            trends_table: config.trends_table.clone(),
            pool_size: config.pool_size,
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Fixes the sampling order, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.credentials.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.credentials.api_key)
            .bearer_auth(&self.credentials.api_key)
    }

    /// Reads up to `pool_size` keyword rows in table order.
    pub async fn fetch_keyword_pool(&self, pool_size: usize) -> Result<Vec<KeywordRecord>> {
        let url = self.table_url(&self.keywords_table);
        tracing::debug!("Listing keywords from: {} (limit {})", url, pool_size);

        let response = self
            .authorized(self.client.get(&url))
            .query(&[("select", KEYWORD_COLUMNS.to_string()), ("limit", pool_size.to_string())])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Keyword listing response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TrendSyncError::UnexpectedStatus {
                context: "keyword listing".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| TrendSyncError::MalformedResponse {
            message: format!("keyword listing: {}", e),
        })
    }
}

#[async_trait]
impl KeywordStore for SupabaseStore {
    async fn list_keywords(&self, limit: usize) -> Result<Vec<KeywordRecord>> {
        let pool = self.fetch_keyword_pool(self.pool_size.max(limit)).await?;
        tracing::debug!("Sampling {} of {} pooled keywords", limit, pool.len());

        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(select_working_set(pool, limit, &mut *rng))
    }

    async fn upsert_rows(&self, rows: &[TrendRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let batch = dedupe_rows(rows);
        let url = self.table_url(&self.trends_table);
        tracing::debug!("Upserting {} rows into {}", batch.len(), url);

        let response = self
            .authorized(self.client.post(&url))
            .query(&[("on_conflict", CONFLICT_KEY)])
            .header("Prefer", UPSERT_PREFERENCE)
            .json(&batch)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(batch.len()),
            _ => Err(TrendSyncError::StoreWrite {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
