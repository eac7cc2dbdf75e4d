use crate::domain::model::{TrendPoint, TrendRow};

/// Pair each complete point with `keyword`. Partial points are dropped and
/// interest is coerced into the 0..=100 scale the provider reports on.
pub fn normalize(keyword: &str, series: &[TrendPoint]) -> Vec<TrendRow> {
    series
        .iter()
        .filter(|point| !point.is_partial)
        .map(|point| TrendRow {
            keyword: keyword.to_string(),
            date: point.date,
            interest: point.interest.clamp(0, 100) as u8,
        })
        .collect()
}
