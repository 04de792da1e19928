use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn api_subscribe_created() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.subscribe_email("new@site.io").await?;

    assert_eq!(
        res.status(),
        StatusCode::CREATED,
        "Wrong response StatusCode: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    assert_eq!(
        json!({
            "success": true,
            "message": "Successfully subscribed!",
            "email": "new@site.io"
        }),
        body
    );

    let stored = app.stored_json()?;
    let subscribers = stored["subscribers"].as_array().expect("subscribers array");
    assert_eq!(1, subscribers.len());
    assert_eq!("new@site.io", subscribers[0]["email"]);
    let subscribed_at = subscribers[0]["subscribedAt"].as_str().expect("timestamp");
    assert!(chrono::DateTime::parse_from_rfc3339(subscribed_at).is_ok());

    Ok(())
}

#[tokio::test]
async fn api_subscribe_duplicate_conflict() -> Result<()> {
    let app = TestApp::spawn().await?;

    let first = app.subscribe_email("new@site.io").await?;
    assert_eq!(StatusCode::CREATED, first.status());

    let repeat = app.subscribe_email("new@site.io").await?;
    assert_eq!(StatusCode::CONFLICT, repeat.status());
    let body: Value = repeat.json().await?;
    assert_eq!(
        json!({
            "success": false,
            "message": "Email already subscribed",
            "email": "new@site.io"
        }),
        body
    );

    assert_eq!(1, app.get_count().await?);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_duplicate_ignores_case() -> Result<()> {
    let app = TestApp::spawn().await?;

    assert_eq!(
        StatusCode::CREATED,
        app.subscribe_email("A@B.com").await?.status()
    );

    let res = app.subscribe_email("a@b.com").await?;
    assert_eq!(StatusCode::CONFLICT, res.status());
    let body: Value = res.json().await?;
    // The submitted email comes back, not the stored one.
    assert_eq!("a@b.com", body["email"]);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_a_400_when_email_is_missing_or_invalid() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({}), "Email is required", "Empty json"),
        (json!({ "email": null }), "Email is required", "Null email"),
        (json!({ "email": "" }), "Email is required", "Empty email"),
        (
            json!({ "email": "not-an-email" }),
            "Invalid email format",
            "No at symbol",
        ),
        (
            json!({ "email": "user@localhost" }),
            "Invalid email format",
            "No dot in domain",
        ),
        (
            json!({ "email": "us er@site.io" }),
            "Invalid email format",
            "Whitespace",
        ),
        (json!({ "email": 42 }), "Invalid request body", "Not a string"),
    ];

    for (body, expected_message, description) in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(
            400,
            res.status().as_u16(),
            "The API did not return a 400 BAD REQUEST the payload was {}.",
            description
        );
        let res_body: Value = res.json().await?;
        assert_eq!(false, res_body["success"], "{description}");
        assert_eq!(expected_message, res_body["message"], "{description}");
        assert!(res_body.get("email").is_none(), "{description}");
    }

    assert_eq!(0, app.get_count().await?);
    assert_eq!(json!({ "subscribers": [] }), app.stored_json()?);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_malformed_body_is_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(format!("http://{}/api/subscribe", app.addr))
        .header("Content-Type", "application/json")
        .body("{ \"email\": ")
        .send()
        .await?;

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await?;
    assert_eq!("Invalid request body", body["message"]);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_survives_restart() -> Result<()> {
    let app = TestApp::spawn().await?;
    for email in ["e1@site.io", "e2@site.io"] {
        assert_eq!(
            StatusCode::CREATED,
            app.subscribe_email(email).await?.status()
        );
    }

    let restarted = app.restart().await?;

    assert_eq!(2, restarted.get_count().await?);
    assert_eq!(
        StatusCode::CONFLICT,
        restarted.subscribe_email("e1@site.io").await?.status()
    );

    Ok(())
}

#[tokio::test]
async fn api_subscribe_unreadable_store_is_500() -> Result<()> {
    // A directory can't be read as the store file.
    let dir = tempfile::TempDir::new()?;
    let store_path = dir.path().join("store-is-a-dir");
    std::fs::create_dir(&store_path)?;
    let app = TestApp::spawn_with_store_path(&store_path).await?;

    let res = app.subscribe_email("new@site.io").await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body: Value = res.json().await?;
    assert_eq!(
        json!({ "success": false, "message": "Failed to save subscription" }),
        body
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn api_subscribe_concurrent_duplicates_store_one_record() -> Result<()> {
    let app = TestApp::spawn().await?;
    let url = format!("http://{}/api/subscribe", app.addr);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = app.http_client.clone();
            let url = url.clone();
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "email": "race@site.io" }))
                    .send()
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await??.status() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(1, created);
    assert_eq!(1, app.get_count().await?);

    Ok(())
}
