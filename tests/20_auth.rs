mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn companies_require_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/companies")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/api/companies"))
        .bearer_auth("definitely.not.valid")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["statusCode"], 401);
    Ok(())
}

#[tokio::test]
async fn refresh_with_garbage_access_token_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/token/refresh"))
        .json(&json!({"accessToken": "garbage", "refreshToken": "garbage"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Invalid client request. The tokenDto has some invalid properties.");
    Ok(())
}

#[tokio::test]
async fn login_without_credentials_is_unprocessable() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/authentication/login"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["errors"]["userName"][0], "User name is required");
    assert_eq!(body["errors"]["password"][0], "Password is required");
    Ok(())
}
