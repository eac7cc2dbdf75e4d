use anyhow::Result;
use chrono::NaiveDate;
use httpmock::prelude::*;
use trend_sync::config::toml_config::StoreConfig;
use trend_sync::core::{KeywordStore, TrendRow};
use trend_sync::{StoreCredentials, SupabaseStore, TrendSyncError};

const API_KEY: &str = "anon-test-key";

fn store_for(server: &MockServer, pool_size: usize) -> SupabaseStore {
    let config = StoreConfig {
        pool_size,
        ..StoreConfig::default()
    };
    SupabaseStore::new(StoreCredentials::new(server.base_url(), API_KEY), &config)
        .unwrap()
        .with_seed(1)
}

fn row(keyword: &str, d: u32, interest: u8) -> TrendRow {
    TrendRow {
        keyword: keyword.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
        interest,
    }
}

#[tokio::test]
async fn test_list_keywords_samples_from_pool() -> Result<()> {
    let server = MockServer::start();
    let pool: Vec<serde_json::Value> = (0..8)
        .map(|i| serde_json::json!({"keyword": format!("kw{}", i), "topic": "t", "country": "DK"}))
        .collect();

    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/keywords")
            .query_param("select", "keyword,topic,country")
            .query_param("limit", "8")
            .header("apikey", API_KEY)
            .header("authorization", format!("Bearer {}", API_KEY));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::Value::Array(pool));
    });

    let store = store_for(&server, 8);
    let selected = store.list_keywords(3).await?;

    list_mock.assert();
    assert_eq!(selected.len(), 3);
    assert!(selected.iter().all(|k| k.keyword.starts_with("kw")));
    Ok(())
}

#[tokio::test]
async fn test_pool_is_never_smaller_than_limit() -> Result<()> {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/keywords")
            .query_param("limit", "25");
        then.status(200)
            .json_body(serde_json::json!([{"keyword": "jul", "topic": null, "country": null}]));
    });

    let store = store_for(&server, 5);
    let selected = store.list_keywords(25).await?;

    list_mock.assert();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].country, "DK");
    Ok(())
}

#[tokio::test]
async fn test_list_keywords_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/keywords");
        then.status(401).body("{\"message\":\"Invalid API key\"}");
    });

    let store = store_for(&server, 10);
    let err = store.list_keywords(3).await.unwrap_err();

    match err {
        TrendSyncError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_keywords_malformed_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/keywords");
        then.status(200).body("<html>maintenance</html>");
    });

    let store = store_for(&server, 10);
    let err = store.list_keywords(3).await.unwrap_err();
    assert!(matches!(err, TrendSyncError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_upsert_declares_conflict_key() -> Result<()> {
    let server = MockServer::start();
    let upsert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/keyword_trends")
            .query_param("on_conflict", "keyword,date")
            .header("prefer", "resolution=merge-duplicates,return=minimal")
            .header("apikey", API_KEY)
            .json_body(serde_json::json!([
                {"keyword": "jul", "date": "2024-01-01", "interest": 37},
                {"keyword": "jul", "date": "2024-01-02", "interest": 52}
            ]));
        then.status(201);
    });

    let store = store_for(&server, 10);
    let rows = vec![row("jul", 1, 37), row("jul", 2, 52)];

    assert_eq!(store.upsert_rows(&rows).await?, 2);
    assert_eq!(store.upsert_rows(&rows).await?, 2);
    upsert_mock.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn test_upsert_collapses_duplicate_keys_in_batch() -> Result<()> {
    let server = MockServer::start();
    let upsert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/keyword_trends")
            .json_body(serde_json::json!([
                {"keyword": "jul", "date": "2024-01-01", "interest": 40}
            ]));
        then.status(204);
    });

    let store = store_for(&server, 10);
    let written = store
        .upsert_rows(&[row("jul", 1, 37), row("jul", 1, 40)])
        .await?;

    upsert_mock.assert();
    assert_eq!(written, 1);
    Ok(())
}

#[tokio::test]
async fn test_upsert_rejected_batch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/v1/keyword_trends");
        then.status(409).body("duplicate key value violates unique constraint");
    });

    let store = store_for(&server, 10);
    let err = store.upsert_rows(&[row("jul", 1, 37)]).await.unwrap_err();

    match err {
        TrendSyncError::StoreWrite { status, body } => {
            assert_eq!(status, 409);
            assert!(body.contains("unique constraint"));
        }
        other => panic!("expected StoreWrite, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upsert_empty_batch_makes_no_request() -> Result<()> {
    let server = MockServer::start();
    let upsert_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/keyword_trends");
        then.status(201);
    });

    let store = store_for(&server, 10);
    assert_eq!(store.upsert_rows(&[]).await?, 0);
    upsert_mock.assert_hits(0);
    Ok(())
}
