mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crosscast::auth::{self, Credential, Platform};
use crosscast::CrosscastError;

use common::token_body;

fn test_credential() -> Credential {
    Credential::new(
        "test-id",
        "test-secret",
        "http://localhost:8080/cb",
        Platform::YouTube,
    )
    .unwrap()
}

#[tokio::test]
async fn code_exchange_populates_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains("client_id=test-id"))
        .and(body_string_contains("client_secret=test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("abc", "r1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let cred = test_credential();
    let before = Utc::now();
    auth::exchange_code(&cred, "the-code", &format!("{}/token", server.uri()))
        .await
        .unwrap();

    let token = cred.token().await;
    assert_eq!(token.access_token, "abc");
    assert_eq!(token.refresh_token, "r1");
    assert_eq!(token.scope, "read");
    assert_eq!(token.expires_in, 3600);
    assert_eq!(token.platform, Platform::YouTube);

    // expires_at is stamped as now + 3600s at exchange completion
    let expected = before + chrono::Duration::seconds(3600);
    let drift = (token.expires_at - expected).num_seconds().abs();
    assert!(drift < 10, "expires_at drifted by {drift}s");
    assert!(!token.is_expired());
}

#[tokio::test]
async fn rejected_exchange_carries_upstream_status_and_leaves_token_unset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .expect(1)
        .mount(&server)
        .await;

    let cred = test_credential();
    let err = auth::exchange_code(&cred, "bad-code", &format!("{}/token", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), 401);
    assert!(matches!(err, CrosscastError::UpstreamStatus { .. }));

    let token = cred.token().await;
    assert!(token.access_token.is_empty());
    assert!(token.is_expired());
}

#[tokio::test]
async fn undecodable_token_response_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let cred = test_credential();
    let err = auth::exchange_code(&cred, "code", &format!("{}/token", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "decode_error");
    assert_eq!(err.status(), 500);
    assert!(cred.token().await.access_token.is_empty());
}

#[tokio::test]
async fn refresh_sends_stored_refresh_token_and_overwrites_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-abc", "r2", 7200)))
        .expect(1)
        .mount(&server)
        .await;

    let cred = test_credential();
    cred.seed_refresh_token("r1").await;
    auth::refresh(&cred, &format!("{}/token", server.uri()))
        .await
        .unwrap();

    let token = cred.token().await;
    assert_eq!(token.access_token, "new-abc");
    assert_eq!(token.refresh_token, "r2");
    assert_eq!(token.expires_in, 7200);
    assert!(!token.is_expired());
}

#[tokio::test]
async fn refresh_keeps_prior_refresh_token_when_response_omits_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-abc",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;

    let cred = test_credential();
    cred.seed_refresh_token("r1").await;
    auth::refresh(&cred, &format!("{}/token", server.uri()))
        .await
        .unwrap();

    let token = cred.token().await;
    assert_eq!(token.access_token, "new-abc");
    assert_eq!(token.refresh_token, "r1");
}

#[tokio::test]
async fn failed_refresh_leaves_prior_token_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("abc", "r1", 3600)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let cred = test_credential();
    let token_url = format!("{}/token", server.uri());
    auth::exchange_code(&cred, "code", &token_url).await.unwrap();

    let err = auth::refresh(&cred, &token_url).await.unwrap_err();
    assert_eq!(err.status(), 500);

    let token = cred.token().await;
    assert_eq!(token.access_token, "abc");
    assert_eq!(token.refresh_token, "r1");
}

#[tokio::test]
async fn missing_expires_in_yields_non_expiring_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "abc",
            "refresh_token": "r1",
            "scope": "non-expiring",
        })))
        .mount(&server)
        .await;

    let cred = test_credential();
    auth::exchange_code(&cred, "code", &format!("{}/token", server.uri()))
        .await
        .unwrap();

    let token = cred.token().await;
    let fifty_years = Utc::now() + chrono::Duration::days(50 * 365);
    assert!(token.expires_at > fifty_years);
    assert!(!token.is_expired());
}

#[tokio::test]
async fn absurd_expires_in_from_provider_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "abc",
            "refresh_token": "r1",
            "expires_in": i64::MAX,
        })))
        .mount(&server)
        .await;

    let cred = test_credential();
    auth::exchange_code(&cred, "code", &format!("{}/token", server.uri()))
        .await
        .unwrap();

    // The lifetime is capped at the non-expiring fallback rather than
    // overflowing the expiry computation.
    let token = cred.token().await;
    assert_eq!(token.access_token, "abc");
    assert!(!token.is_expired());
    let cap = Utc::now() + chrono::Duration::seconds(crosscast::auth::NON_EXPIRING_SECS);
    assert!(token.expires_at <= cap);
}

#[tokio::test]
async fn non_200_success_status_from_token_endpoint_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(202).set_body_json(token_body("abc", "r1", 3600)))
        .mount(&server)
        .await;

    let cred = test_credential();
    let err = auth::exchange_code(&cred, "code", &format!("{}/token", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), 202);
    assert!(cred.token().await.access_token.is_empty());
}

#[tokio::test]
async fn ensure_fresh_skips_the_network_when_token_is_valid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("abc", "r1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let cred = test_credential();
    let token_url = format!("{}/token", server.uri());
    auth::exchange_code(&cred, "code", &token_url).await.unwrap();

    // No refresh mock is mounted; any outbound refresh would fail.
    let token = auth::ensure_fresh(&cred, &token_url).await.unwrap();
    assert_eq!(token.access_token, "abc");
}

#[tokio::test]
async fn concurrent_ensure_fresh_refreshes_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("fresh", "r2", 3600))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Seeding only a refresh token leaves the credential expired.
    let cred = Arc::new(test_credential());
    cred.seed_refresh_token("r1").await;
    assert!(cred.is_expired().await);

    let token_url = format!("{}/token", server.uri());
    let a = tokio::spawn({
        let cred = Arc::clone(&cred);
        let token_url = token_url.clone();
        async move { auth::ensure_fresh(&cred, &token_url).await }
    });
    let b = tokio::spawn({
        let cred = Arc::clone(&cred);
        let token_url = token_url.clone();
        async move { auth::ensure_fresh(&cred, &token_url).await }
    });

    let token_a = a.await.unwrap().unwrap();
    let token_b = b.await.unwrap().unwrap();

    // Both callers observe the token produced by the single refresh.
    assert_eq!(token_a.access_token, "fresh");
    assert_eq!(token_b.access_token, "fresh");
    assert_eq!(token_a.expires_at, token_b.expires_at);
    server.verify().await;
}

#[tokio::test]
async fn refresh_without_refresh_token_never_touches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("abc", "r1", 3600)))
        .expect(0)
        .mount(&server)
        .await;

    let cred = test_credential();
    let err = auth::refresh(&cred, &format!("{}/token", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, CrosscastError::MissingRefreshToken));
    server.verify().await;
}
