mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn public_status_needs_no_credentials() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.url("/api/public")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store, no-cache, must-revalidate, proxy-revalidate")
    );

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Server is running");
    Ok(())
}

#[tokio::test]
async fn health_reports_storage_state() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "ok");

    server.repo.set_unavailable(true);
    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json::<Value>().await?["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_an_internal_error() -> Result<()> {
    let server = common::TestServer::start().await?;
    server.repo.set_unavailable(true);

    let res = server.get_as("/api/observations", &server.member_token("NORTH")).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    Ok(())
}
