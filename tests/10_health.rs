mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_reports_name_and_version() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "groupchat-api");
    assert!(body.get("version").is_some(), "missing version: {}", body);

    Ok(())
}

#[tokio::test]
async fn health_reports_database_state() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected health status {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    let status = body["status"].as_str().unwrap_or_default();
    assert!(
        status == "ok" || status == "degraded",
        "unexpected status field: {}",
        body
    );

    Ok(())
}
