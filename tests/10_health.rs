mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/health")).await?;

    // Liveness only; the database may not be running
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    assert_eq!(res.headers()["api-supported-versions"], "1.0, 2.0");

    let body = res.json::<serde_json::Value>().await?;
    assert!(body["status"].is_string());
    Ok(())
}

#[tokio::test]
async fn api_root_lists_links() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/api"))
        .header("Accept", "application/vnd.codemaze.apiroot+json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let links = res.json::<serde_json::Value>().await?;
    assert_eq!(links[0]["href"], server.url("/api"));
    assert_eq!(links[1]["rel"], "companies");

    let res = client.get(server.url("/api")).header("Accept", "application/json").send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn unsupported_api_version_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .get(server.url("/api"))
        .header("api-version", "9.0")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
