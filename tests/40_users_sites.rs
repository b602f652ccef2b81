mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

fn names(users: &[Value]) -> Vec<&str> {
    users.iter().map(|u| u["name"].as_str().unwrap_or_default()).collect()
}

#[tokio::test]
async fn member_lists_own_site_users_by_name() -> Result<()> {
    let server = common::TestServer::start().await?;

    let users = server
        .get_as("/api/users?siteCode=SOUTH", &server.member_token("NORTH"))
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(names(&users), vec!["Pat Lee", "Riley Chen", "Sam Ortiz"]);
    assert!(users.iter().all(|u| u["site"]["code"] == "NORTH"));
    Ok(())
}

#[tokio::test]
async fn supervisor_filter_is_stable_across_reads() -> Result<()> {
    let server = common::TestServer::start().await?;
    let token = server.admin_token(None);

    let first = server
        .get_as("/api/users?isSupervisor=true", &token)
        .await?
        .json::<Vec<Value>>()
        .await?;
    let second = server
        .get_as("/api/users?isSupervisor=true", &token)
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(first, second);
    assert_eq!(names(&first), vec!["Jordan Diaz", "Pat Lee", "Riley Chen"]);
    assert!(first.iter().all(|u| u["isSupervisor"] == true));
    Ok(())
}

#[tokio::test]
async fn admin_can_scope_users_to_a_site() -> Result<()> {
    let server = common::TestServer::start().await?;

    let users = server
        .get_as("/api/users?siteCode=south&isSupervisor=false", &server.admin_token(Some("NORTH")))
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(names(&users), vec!["Avery Brooks"]);
    Ok(())
}

#[tokio::test]
async fn site_listing_depends_on_role() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.get_as("/api/sites", &server.admin_token(None)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let codes: Vec<String> = res
        .json::<Vec<Value>>()
        .await?
        .iter()
        .filter_map(|s| s["code"].as_str().map(str::to_string))
        .collect();
    assert_eq!(codes, vec!["EAST", "NORTH", "SOUTH"]);

    let own = server
        .get_as("/api/sites", &server.member_token("SOUTH"))
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["code"], "SOUTH");

    let unknown = server
        .get_as("/api/sites", &server.member_token("WEST"))
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert!(unknown.is_empty());
    Ok(())
}
