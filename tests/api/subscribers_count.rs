use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn count_empty_store_is_zero() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .get(format!("http://{}/api/subscribers/count", app.addr))
        .send()
        .await?;

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await?;
    assert_eq!(json!({ "count": 0 }), body);

    Ok(())
}

#[tokio::test]
async fn count_follows_subscriptions() -> Result<()> {
    let app = TestApp::spawn().await?;

    for (i, email) in ["one@site.io", "two@site.io", "three@site.io"]
        .into_iter()
        .enumerate()
    {
        app.subscribe_email(email).await?;
        assert_eq!(i as u64 + 1, app.get_count().await?);
    }

    // Rejected attempts don't change anything.
    app.subscribe_email("TWO@site.io").await?;
    app.subscribe_email("broken").await?;
    assert_eq!(3, app.get_count().await?);

    Ok(())
}

#[tokio::test]
async fn count_reads_existing_store_file() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("subscribers.json");
    std::fs::write(
        &path,
        r#"{
  "subscribers": [
    { "email": "old@site.io", "subscribedAt": "2025-01-14T09:03:11.482Z" },
    { "email": "older@site.io", "subscribedAt": "2024-12-01T00:00:00.000Z" }
  ]
}"#,
    )?;

    let app = TestApp::spawn_with_store_path(&path).await?;

    assert_eq!(2, app.get_count().await?);
    assert_eq!(
        StatusCode::CONFLICT,
        app.subscribe_email("OLD@site.io").await?.status()
    );

    Ok(())
}

#[tokio::test]
async fn count_corrupt_store_is_zero_and_subscribe_fails() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("subscribers.json");
    std::fs::write(&path, "{ not json")?;

    let app = TestApp::spawn_with_store_path(&path).await?;

    assert_eq!(0, app.get_count().await?);
    assert_eq!(
        StatusCode::INTERNAL_SERVER_ERROR,
        app.subscribe_email("new@site.io").await?.status()
    );
    // The broken file is left alone.
    assert_eq!("{ not json", std::fs::read_to_string(&path)?);

    Ok(())
}
