//! Integration tests for the Reddit collector using wiremock HTTP mocks.

use std::time::Duration;

use trendwatch_core::{Platform, RedditCredentials};
use trendwatch_sources::{RedditClient, RedditSource, TrendSource};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> RedditCredentials {
    RedditCredentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
    }
}

fn test_client(server: &MockServer) -> RedditClient {
    RedditClient::with_base_urls(
        credentials(),
        "TrendExtractor/1.0",
        30,
        &server.uri(),
        &server.uri(),
    )
    .expect("client construction should not fail")
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "abc123",
            "token_type": "bearer",
            "expires_in": 86400
        })))
        .mount(server)
        .await;
}

fn listing(posts: &[(&str, i64, i64)]) -> serde_json::Value {
    let children: Vec<serde_json::Value> = posts
        .iter()
        .enumerate()
        .map(|(i, (title, score, comments))| {
            serde_json::json!({
                "kind": "t3",
                "data": {
                    "title": title,
                    "score": score,
                    "num_comments": comments,
                    "permalink": format!("/r/test/comments/{i}/post/"),
                    "upvote_ratio": 0.9
                }
            })
        })
        .collect();
    serde_json::json!({ "kind": "Listing", "data": { "children": children, "after": null } })
}

#[tokio::test]
async fn fetch_token_uses_client_credentials() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let token = test_client(&server).fetch_token().await.unwrap();
    assert_eq!(token, "abc123");
}

#[tokio::test]
async fn rejected_credentials_are_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_token().await.unwrap_err();
    assert!(matches!(err, trendwatch_sources::SourceError::Auth(_)));
}

#[tokio::test]
async fn hot_posts_sends_bearer_token_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/marketing/hot"))
        .and(header("Authorization", "Bearer abc123"))
        .and(query_param("limit", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(&[("Is SEO dead?", 340, 88), ("Email open rates", 12, 3)])),
        )
        .mount(&server)
        .await;

    let posts = test_client(&server)
        .hot_posts("abc123", "marketing", 2)
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].keyword, "Is SEO dead?");
    assert_eq!(posts[0].platform, Platform::Reddit);
    assert_eq!(posts[0].volume, 340);
    assert_eq!(posts[0].engagement_score, 428.0);
    assert_eq!(posts[0].metadata["subreddit"], "marketing");
    assert_eq!(
        posts[0].metadata["url"],
        "https://reddit.com/r/test/comments/0/post/"
    );
}

#[tokio::test]
async fn failing_subreddit_does_not_abort_the_pass() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/SEO/hot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[("Core update", 50, 10)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/private_sub/hot"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = RedditSource::new(
        test_client(&server),
        vec!["private_sub".to_string(), "SEO".to_string()],
        50,
        Duration::ZERO,
    );

    let collection = source.collect().await;
    assert_eq!(collection.calls_failed, 1);
    assert_eq!(collection.calls_succeeded, 1);
    assert_eq!(collection.observations.len(), 1);
    assert_eq!(collection.observations[0].keyword, "Core update");
}

#[tokio::test]
async fn token_failure_counts_every_subreddit_as_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = RedditSource::new(
        test_client(&server),
        vec!["marketing".to_string(), "SEO".to_string(), "socialmedia".to_string()],
        50,
        Duration::ZERO,
    );

    let collection = source.collect().await;
    assert_eq!(collection.calls_failed, 3);
    assert!(collection.all_failed());
}
