use crate::domain::model::{KeywordRecord, TrendRow};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Shuffle the pool and keep the first `limit` entries, so repeated runs with
/// a small limit cover the whole pool over time.
pub fn select_working_set<R: Rng + ?Sized>(
    mut pool: Vec<KeywordRecord>,
    limit: usize,
    rng: &mut R,
) -> Vec<KeywordRecord> {
    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}

/// Collapse rows sharing (keyword, date), keeping the last one seen and the
/// position of the first.
pub fn dedupe_rows(rows: &[TrendRow]) -> Vec<TrendRow> {
    let mut positions: HashMap<(&str, chrono::NaiveDate), usize> = HashMap::new();
    let mut unique: Vec<TrendRow> = Vec::with_capacity(rows.len());

    for row in rows {
        match positions.get(&row.key()) {
            Some(&index) => unique[index] = row.clone(),
            None => {
                positions.insert(row.key(), unique.len());
                unique.push(row.clone());
            }
        }
    }

    unique
}
