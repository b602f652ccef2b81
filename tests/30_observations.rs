mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn sites_of(observations: &[Value]) -> Vec<&str> {
    observations
        .iter()
        .map(|o| o["site"]["code"].as_str().unwrap_or_default())
        .collect()
}

fn dates_of(observations: &[Value]) -> Vec<&str> {
    observations
        .iter()
        .map(|o| o["date"].as_str().map(|d| &d[..10]).unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn member_sees_only_own_site_even_when_asking_for_another() -> Result<()> {
    let server = common::TestServer::start().await?;
    let token = server.member_token("NORTH");

    for path in ["/api/observations", "/api/observations?siteCode=SOUTH"] {
        let observations = server.get_as(path, &token).await?.json::<Vec<Value>>().await?;
        assert_eq!(sites_of(&observations), vec!["NORTH", "NORTH", "NORTH"], "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn admin_site_filter_overrides_home_site() -> Result<()> {
    let server = common::TestServer::start().await?;
    let token = server.admin_token(Some("NORTH"));

    let south = server
        .get_as("/api/observations?siteCode=south", &token)
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(sites_of(&south), vec!["SOUTH"]);

    let all = server.get_as("/api/observations", &token).await?.json::<Vec<Value>>().await?;
    assert_eq!(all.len(), 4);
    Ok(())
}

#[tokio::test]
async fn unfiltered_admin_results_order_by_date_then_site() -> Result<()> {
    let server = common::TestServer::start().await?;

    let all = server
        .get_as("/api/observations", &server.admin_token(None))
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(
        dates_of(&all),
        vec!["2024-03-10", "2024-03-05", "2024-03-05", "2024-03-01"]
    );
    assert_eq!(sites_of(&all), vec!["NORTH", "NORTH", "SOUTH", "NORTH"]);
    Ok(())
}

#[tokio::test]
async fn date_range_is_inclusive_on_both_ends() -> Result<()> {
    let server = common::TestServer::start().await?;

    let found = server
        .get_as(
            "/api/observations?startDate=2024-03-01&endDate=2024-03-05",
            &server.member_token("NORTH"),
        )
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(dates_of(&found), vec!["2024-03-05", "2024-03-01"]);
    Ok(())
}

#[tokio::test]
async fn supervisor_filter_is_exact() -> Result<()> {
    let server = common::TestServer::start().await?;
    let token = server.member_token("NORTH");

    let exact = server
        .get_as("/api/observations?supervisorName=Pat%20Lee", &token)
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0]["supervisorName"], "Pat Lee");

    let partial = server
        .get_as("/api/observations?supervisorName=pat", &token)
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert!(partial.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_date_filters_are_reported() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server
        .get_as(
            "/api/observations?startDate=last-week&endDate=2024-13-01",
            &server.member_token("NORTH"),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "startDate");
    assert_eq!(body["errors"][1]["field"], "endDate");
    Ok(())
}

#[tokio::test]
async fn member_create_is_pinned_to_own_site() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut body = common::observation_body();
    body["siteCode"] = json!("SOUTH");

    let res = server.post_as("/api/observations", &server.member_token("NORTH"), &body).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let created = res.json::<Value>().await?;
    assert_eq!(created["site"]["code"], "NORTH");
    assert_eq!(created["shift"], 2);
    assert_eq!(created["topic"], "At Risk Behavior");

    let south = server
        .get_as("/api/observations?siteCode=SOUTH", &server.admin_token(None))
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(south.len(), 1);
    Ok(())
}

#[tokio::test]
async fn admin_create_with_unknown_site_writes_nothing() -> Result<()> {
    let server = common::TestServer::start().await?;
    let token = server.admin_token(Some("NORTH"));
    let mut body = common::observation_body();
    body["siteCode"] = json!("NONEXISTENT");

    let res = server.post_as("/api/observations", &token, &body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Invalid site code");

    let all = server.get_as("/api/observations", &token).await?.json::<Vec<Value>>().await?;
    assert_eq!(all.len(), 4);
    Ok(())
}

#[tokio::test]
async fn admin_create_targets_requested_site() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut body = common::observation_body();
    body["siteCode"] = json!("east");

    let res = server.post_as("/api/observations", &server.admin_token(Some("NORTH")), &body).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["site"]["code"], "EAST");
    Ok(())
}

#[tokio::test]
async fn unsafe_condition_without_associate_stores_placeholder() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut body = common::observation_body();
    body["topic"] = json!("Unsafe Condition");
    body["associateName"] = json!("");

    let res = server.post_as("/api/observations", &server.member_token("NORTH"), &body).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["associateName"], "N/A");
    Ok(())
}

#[tokio::test]
async fn invalid_submission_lists_every_violation() -> Result<()> {
    let server = common::TestServer::start().await?;
    let before = server.repo.call_count();
    let body = json!({
        "date": "2999-01-01",
        "supervisorName": " ",
        "shift": 4,
        "topic": "Positive Reinforcement",
        "associateName": "",
        "actionAddressed": "",
    });

    let res = server.post_as("/api/observations", &server.member_token("NORTH"), &body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let errors = res.json::<Value>().await?["errors"].clone();
    let fields: Vec<&str> = errors
        .as_array()
        .map(|errs| errs.iter().filter_map(|e| e["field"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(
        fields,
        vec!["date", "supervisorName", "shift", "associateName", "actionAddressed"]
    );
    assert_eq!(server.repo.call_count(), before);
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_a_bad_request() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/observations"))
        .bearer_auth(server.member_token("NORTH"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "BAD_REQUEST");
    Ok(())
}
