pub mod backoff;
pub mod engine;
pub mod normalize;

pub use crate::domain::model::{KeywordRecord, RunOutcome, TrendPoint, TrendRow, TrendWindow};
pub use crate::domain::ports::{KeywordStore, TrendSource};
pub use crate::utils::error::Result;
