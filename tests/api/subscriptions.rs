use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, body_json, body_partial_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, TEST_API_KEY};

#[tokio::test]
async fn subscribe_weekend_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(TestApp::subscriptions_path()))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(body_json(json!({
            "email": "a@b.com",
            "send_welcome_email": true,
            "source": "QorTruth.news",
            "utm_source": "website",
            "utm_medium": "newsletter+weekend",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "sub_1"}})))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let res = app
        .post_subscription(json!({"email": "a@b.com", "weekend": true}).to_string())
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::OK,
        "Wrong response StatusCode: {}",
        res.status()
    );
    assert_eq!(
        json!({"message": "Subscribed successfully."}),
        res.json::<Value>().await?
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_without_weekend_uses_newsletter_medium() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(TestApp::subscriptions_path()))
        .and(method("POST"))
        .and(body_partial_json(json!({"utm_medium": "newsletter"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let res = app
        .post_subscription(json!({"email": "ursula@le-guin.com"}).to_string())
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_400_for_invalid_emails() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.beehiiv_server)
        .await;

    let cases = [
        (json!({"email": "", "weekend": false}), "Empty email"),
        (json!({"email": "not-an-email", "weekend": false}), "Missing @"),
        (json!({"weekend": true}), "Missing email"),
        (json!({"email": null}), "Null email"),
    ];

    for (body, description) in cases {
        let res = app.post_subscription(body.to_string()).await?;
        assert_eq!(
            400,
            res.status().as_u16(),
            "The API did not return a 400 BAD REQUEST, the payload was: {description}."
        );
        assert_eq!(
            json!({"message": "Please provide a valid email address."}),
            res.json::<Value>().await?
        );
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_relays_upstream_errors() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(TestApp::subscriptions_path()))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Email already subscribed"})),
        )
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let res = app
        .post_subscription(json!({"email": "a@b.com", "weekend": false}).to_string())
        .await?;

    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, res.status());
    assert_eq!(
        json!({"message": "Email already subscribed"}),
        res.json::<Value>().await?
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_upstream_error_without_json_uses_fallback() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let res = app
        .post_subscription(json!({"email": "a@b.com"}).to_string())
        .await?;

    assert_eq!(StatusCode::BAD_GATEWAY, res.status());
    assert_eq!(
        json!({"message": "Unable to subscribe right now."}),
        res.json::<Value>().await?
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_success_with_unparsable_upstream_body() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let res = app
        .post_subscription(json!({"email": "a@b.com"}).to_string())
        .await?;

    assert_eq!(StatusCode::OK, res.status());

    Ok(())
}

#[tokio::test]
async fn subscribe_unparsable_body_is_a_500() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.beehiiv_server)
        .await;

    for body in ["{\"email\": ", "", "email=a@b.com"] {
        let res = app.post_subscription(body).await?;

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status(), "for: {body:?}");
        let body: Value = res.json().await?;
        let message = body["message"].as_str().unwrap_or_default();
        assert!(!message.is_empty());
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_upstream_timeout_is_a_500() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(180)))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let res = app
        .post_subscription(json!({"email": "a@b.com"}).to_string())
        .await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body: Value = res.json().await?;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(!message.is_empty());
    assert!(!message.contains(crate::helpers::TEST_PUBLICATION_ID));

    Ok(())
}

#[tokio::test]
async fn subscribe_twice_calls_upstream_twice() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(TestApp::subscriptions_path()))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.beehiiv_server)
        .await;

    let body = json!({"email": "a@b.com", "weekend": false}).to_string();
    for _ in 0..2 {
        let res = app.post_subscription(body.clone()).await?;
        assert_eq!(StatusCode::OK, res.status());
        assert_eq!(
            json!({"message": "Subscribed successfully."}),
            res.json::<Value>().await?
        );
    }

    Ok(())
}
