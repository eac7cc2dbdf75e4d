use crate::domain::model::{KeywordRecord, TrendPoint, TrendRow, TrendWindow};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of per-keyword interest series. One call is one provider query.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Returns the series in chronological order, or an empty vec when the
    /// provider has no data for the term. Rate-limit rejections surface as
    /// `TrendSyncError::Throttled`.
    async fn fetch(
        &self,
        keyword: &str,
        geo: &str,
        window: TrendWindow,
    ) -> Result<Vec<TrendPoint>>;
}

#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// Randomly sampled working set of at most `limit` keywords.
    async fn list_keywords(&self, limit: usize) -> Result<Vec<KeywordRecord>>;

    /// Idempotent upsert keyed on (keyword, date). Returns the number of rows sent.
    async fn upsert_rows(&self, rows: &[TrendRow]) -> Result<usize>;
}
