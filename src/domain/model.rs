use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_country() -> String {
    "DK".to_string()
}

/// A tracked search term as stored in the keywords table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    /// Carried for reporting only; a null or missing topic is tolerated.
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default = "default_country", deserialize_with = "country_or_default")]
    pub country: String,
}

fn country_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(default_country))
}

impl KeywordRecord {
    pub fn new(keyword: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            topic: None,
            country: country.into(),
        }
    }
}

/// One provider sample before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub interest: i64,
    /// The provider marks the still-accumulating latest period as partial.
    pub is_partial: bool,
}

impl TrendPoint {
    pub fn new(date: NaiveDate, interest: i64) -> Self {
        Self {
            date,
            interest,
            is_partial: false,
        }
    }

    pub fn partial(date: NaiveDate, interest: i64) -> Self {
        Self {
            date,
            interest,
            is_partial: true,
        }
    }
}

/// The persisted unit, unique per (keyword, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRow {
    pub keyword: String,
    pub date: NaiveDate,
    pub interest: u8,
}

impl TrendRow {
    pub fn key(&self) -> (&str, NaiveDate) {
        (&self.keyword, self.date)
    }
}

/// Fixed query window. Only the trailing year is ever requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendWindow {
    #[default]
    Trailing12Months,
}

impl TrendWindow {
    pub fn as_query(&self) -> &'static str {
        match self {
            TrendWindow::Trailing12Months => "today 12-m",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub keywords_attempted: usize,
    pub rows_written: usize,
    pub keywords_failed: usize,
}
