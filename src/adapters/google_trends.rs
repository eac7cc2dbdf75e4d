use crate::config::toml_config::ProviderConfig;
use crate::domain::model::{TrendPoint, TrendWindow};
use crate::domain::ports::TrendSource;
use crate::utils::error::{Result, TrendSyncError};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;

const TIMESERIES_WIDGET: &str = "TIMESERIES";

/// Interest-over-time client for the Google Trends web API.
///
/// A query is two requests: `explore` hands out a signed token for the
/// TIMESERIES widget, then `widgetdata/multiline` returns the series. Both
/// bodies start with an anti-XSSI prefix. The first query also primes the
/// session cookie, without which explore calls are rejected with 429.
pub struct GoogleTrendsClient {
    client: Client,
    base_url: String,
    hl: String,
    tz: i32,
    session: OnceCell<()>,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Timeline {
    #[serde(default)]
    timeline_data: Vec<TimelineEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineEntry {
    time: String,
    #[serde(default)]
    value: Vec<i64>,
    #[serde(default)]
    is_partial: bool,
}

impl GoogleTrendsClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            hl: config.hl.clone(),
            tz: config.tz,
            session: OnceCell::new(),
        })
    }

    fn check_status(response: &Response, keyword: &str, context: &str) -> Result<()> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TrendSyncError::Throttled {
                keyword: keyword.to_string(),
            });
        }
        if !status.is_success() {
            return Err(TrendSyncError::UnexpectedStatus {
                context: format!("{} for '{}'", context, keyword),
                status: status.as_u16(),
                body: String::new(),
            });
        }
        Ok(())
    }

    async fn ensure_session(&self, keyword: &str) -> Result<()> {
        self.session
            .get_or_try_init(|| async {
                let geo = self.hl.rsplit('-').next().unwrap_or_default();
                tracing::debug!("Priming provider session cookie (geo={})", geo);
                let response = self
                    .client
                    .get(format!("{}/trends/explore", self.base_url))
                    .query(&[("geo", geo)])
                    .send()
                    .await?;
                Self::check_status(&response, keyword, "session bootstrap")
            })
            .await
            .map(|_| ())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        keyword: &str,
        context: &str,
    ) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("hl", self.hl.clone()), ("tz", self.tz.to_string())])
            .query(params)
            .send()
            .await?;

        tracing::debug!("{} response status: {}", context, response.status());
        Self::check_status(&response, keyword, context)?;

        let body = response.text().await?;
        parse_prefixed_json(&body).map_err(|e| TrendSyncError::MalformedResponse {
            message: format!("{} for '{}': {}", context, keyword, e),
        })
    }

    async fn timeseries_widget(
        &self,
        keyword: &str,
        geo: &str,
        window: TrendWindow,
    ) -> Result<Option<(String, serde_json::Value)>> {
        let explore_request = serde_json::json!({
            "comparisonItem": [{
                "keyword": keyword,
                "time": window.as_query(),
                "geo": geo,
            }],
            "category": 0,
            "property": "",
        });

        let explore: ExploreResponse = self
            .get_json(
                "/trends/api/explore",
                &[("req", explore_request.to_string())],
                keyword,
                "explore",
            )
            .await?;

        Ok(explore
            .widgets
            .into_iter()
            .find(|widget| widget.id == TIMESERIES_WIDGET)
            .and_then(|widget| Some((widget.token?, widget.request?))))
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsClient {
    async fn fetch(
        &self,
        keyword: &str,
        geo: &str,
        window: TrendWindow,
    ) -> Result<Vec<TrendPoint>> {
        self.ensure_session(keyword).await?;

        let Some((token, request)) = self.timeseries_widget(keyword, geo, window).await? else {
            tracing::debug!("No TIMESERIES widget for '{}'", keyword);
            return Ok(Vec::new());
        };

        let series: MultilineResponse = self
            .get_json(
                "/trends/api/widgetdata/multiline",
                &[("req", request.to_string()), ("token", token)],
                keyword,
                "multiline",
            )
            .await?;

        series
            .default
            .timeline_data
            .into_iter()
            .map(|entry| to_point(entry, keyword))
            .collect()
    }
}

fn to_point(entry: TimelineEntry, keyword: &str) -> Result<TrendPoint> {
    let malformed = |message: String| TrendSyncError::MalformedResponse {
        message: format!("timeline for '{}': {}", keyword, message),
    };

    let seconds: i64 = entry
        .time
        .parse()
        .map_err(|_| malformed(format!("bad timestamp '{}'", entry.time)))?;
    let date = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| malformed(format!("timestamp out of range: {}", seconds)))?
        .date_naive();

    Ok(TrendPoint {
        date,
        interest: entry.value.first().copied().unwrap_or(0),
        is_partial: entry.is_partial,
    })
}

/// Parses a body that carries a junk prefix such as `)]}',` before the JSON object.
fn parse_prefixed_json<T: DeserializeOwned>(body: &str) -> std::result::Result<T, String> {
    let start = body
        .find('{')
        .ok_or_else(|| "no JSON object in response".to_string())?;
    serde_json::from_str(&body[start..]).map_err(|e| e.to_string())
}
