mod common;

use std::{sync::Arc, time::Duration as StdDuration};

use chrono::Duration;
use common::*;
use coverart::{error::ProxyError, management::TokenStatus};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path},
};

#[tokio::test]
async fn test_first_call_fetches_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("authorization", EXPECTED_BASIC))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(token_body("abc", 3600))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = token_manager(&server, ManualClock::new(start_time()));
    assert_eq!(tokens.status().await, TokenStatus::NoToken);
    assert!(tokens.is_expired().await);

    let first = tokens.get_valid_token().await.unwrap();
    let second = tokens.get_valid_token().await.unwrap();

    assert_eq!(first.value, "abc");
    assert_eq!(first, second);
    assert_eq!(tokens.status().await, TokenStatus::Valid);
    assert_eq!(token_requests(&server).await, 1);
}

#[tokio::test]
async fn test_token_lifetime_is_expires_in_milliseconds() {
    let server = MockServer::start().await;
    mount_token_once(&server, "abc").await;

    let clock = ManualClock::new(start_time());
    let tokens = token_manager(&server, clock.clone());

    let token = tokens.get_valid_token().await.unwrap();
    assert_eq!(
        token.expires_at,
        start_time() + Duration::milliseconds(3_600_000)
    );
}

#[tokio::test]
async fn test_cache_hit_until_expiry_then_single_refetch() {
    let server = MockServer::start().await;
    mount_token_once(&server, "abc").await;
    mount_token_once(&server, "def").await;

    let clock = ManualClock::new(start_time());
    let tokens = token_manager(&server, clock.clone());

    assert_eq!(tokens.get_valid_token().await.unwrap().value, "abc");

    clock.advance(Duration::milliseconds(3_599_999));
    assert!(!tokens.is_expired().await);
    assert_eq!(tokens.get_valid_token().await.unwrap().value, "abc");
    assert_eq!(token_requests(&server).await, 1);

    // expiry is inclusive: now == expires_at is already dead
    clock.advance(Duration::milliseconds(1));
    assert_eq!(tokens.status().await, TokenStatus::Expired);

    assert_eq!(tokens.get_valid_token().await.unwrap().value, "def");
    assert_eq!(tokens.get_valid_token().await.unwrap().value, "def");
    assert_eq!(token_requests(&server).await, 2);
}

#[tokio::test]
async fn test_call_one_millisecond_after_expiry_refetches() {
    let server = MockServer::start().await;
    mount_token_once(&server, "abc").await;
    mount_token_once(&server, "def").await;

    let clock = ManualClock::new(start_time());
    let tokens = token_manager(&server, clock.clone());
    tokens.get_valid_token().await.unwrap();

    clock.advance(Duration::milliseconds(3_600_001));
    let token = tokens.get_valid_token().await.unwrap();

    assert_eq!(token.value, "def");
    assert_eq!(
        token.expires_at,
        start_time() + Duration::milliseconds(3_600_001 + 3_600_000)
    );
}

#[tokio::test]
async fn test_failed_refresh_leaves_cached_token_untouched() {
    let server = MockServer::start().await;
    mount_token_once(&server, "abc").await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_client"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new(start_time());
    let tokens = token_manager(&server, clock.clone());
    let original = tokens.get_valid_token().await.unwrap();

    clock.advance(Duration::hours(2));
    let result = tokens.get_valid_token().await;

    assert!(matches!(result, Err(ProxyError::TokenFetch(_))));
    assert_eq!(tokens.current_token().await, Some(original));
}

#[tokio::test]
async fn test_rejected_credentials_without_cached_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = token_manager(&server, ManualClock::new(start_time()));
    let result = tokens.get_valid_token().await;

    assert!(matches!(result, Err(ProxyError::TokenFetch(_))));
    assert_eq!(tokens.status().await, TokenStatus::NoToken);
}

#[tokio::test]
async fn test_malformed_token_response_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let tokens = token_manager(&server, ManualClock::new(start_time()));

    assert!(matches!(
        tokens.get_valid_token().await,
        Err(ProxyError::TokenFetch(_))
    ));
    assert_eq!(tokens.current_token().await, None);
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_fetch_error() {
    let server = MockServer::start().await;
    let tokens = token_manager(&server, ManualClock::new(start_time()));
    drop(server);

    assert!(matches!(
        tokens.get_valid_token().await,
        Err(ProxyError::TokenFetch(_))
    ));
}

#[tokio::test]
async fn test_concurrent_callers_share_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_body("abc", 3600).set_delay(StdDuration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = token_manager(&server, ManualClock::new(start_time()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tokens = Arc::clone(&tokens);
            tokio::spawn(async move { tokens.get_valid_token().await })
        })
        .collect();

    for handle in handles {
        let token = handle.await.unwrap().unwrap();
        assert_eq!(token.value, "abc");
    }
    assert_eq!(token_requests(&server).await, 1);
}

#[tokio::test]
async fn test_force_refresh_bypasses_expiry_check() {
    let server = MockServer::start().await;
    mount_token_once(&server, "abc").await;
    mount_token_once(&server, "def").await;

    let tokens = token_manager(&server, ManualClock::new(start_time()));
    let rejected = tokens.get_valid_token().await.unwrap();
    assert!(!tokens.is_expired().await);

    let renewed = tokens.force_refresh(&rejected).await.unwrap();

    assert_eq!(renewed.value, "def");
    assert_eq!(tokens.get_valid_token().await.unwrap().value, "def");
    assert_eq!(token_requests(&server).await, 2);
}

#[tokio::test]
async fn test_force_refresh_reuses_token_renewed_by_another_caller() {
    let server = MockServer::start().await;
    mount_token_once(&server, "abc").await;
    mount_token_once(&server, "def").await;

    let tokens = token_manager(&server, ManualClock::new(start_time()));
    let rejected = tokens.get_valid_token().await.unwrap();

    let first = tokens.force_refresh(&rejected).await.unwrap();
    let second = tokens.force_refresh(&rejected).await.unwrap();

    assert_eq!(first.value, "def");
    assert_eq!(second, first);
    assert_eq!(token_requests(&server).await, 2);
}
