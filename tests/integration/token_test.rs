//! Integration tests for session token issuance, expiry, and transport.

mod helpers;

use chrono::Duration;

use abyss_auth::jwt::{JwtDecoder, TokenRejection};
use abyss_core::error::ErrorKind;
use helpers::{STRONG_PASSWORD, TestApp, cookie_header, test_config};

#[tokio::test]
async fn test_token_lifetime_follows_clock() {
    let app = TestApp::new();
    app.register("alice").await;
    let header = cookie_header(&app.signin_token("alice").await);

    app.clock.advance(Duration::minutes(59));
    assert!(app.manager.authenticate_request(Some(&header)).is_ok());

    app.clock.advance(Duration::minutes(2));
    let err = app.manager.authenticate_request(Some(&header)).unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));
}

#[tokio::test]
async fn test_spliced_signature_rejected() {
    let app = TestApp::new();
    app.register("alice").await;
    app.register("bob").await;
    let alice = app.signin_token("alice").await;
    let bob = app.signin_token("bob").await;

    // Bob's header and payload under Alice's signature.
    let (bob_body, _) = bob.rsplit_once('.').unwrap();
    let (_, alice_sig) = alice.rsplit_once('.').unwrap();
    let forged = format!("{bob_body}.{alice_sig}");

    assert!(app.manager.authenticate_request(Some(&cookie_header(&forged))).is_err());
}

#[tokio::test]
async fn test_every_altered_signature_character_rejected() {
    let app = TestApp::new();
    app.register("alice").await;
    let token = app.signin_token("alice").await;
    let sig_start = token.rfind('.').unwrap() + 1;

    for i in sig_start..token.len() {
        let mut bytes = token.clone().into_bytes();
        bytes[i] = if bytes[i] == b'x' { b'y' } else { b'x' };
        let altered = String::from_utf8(bytes).unwrap();
        assert!(
            app.manager.authenticate_request(Some(&cookie_header(&altered))).is_err(),
            "position {i}"
        );
    }
}

#[tokio::test]
async fn test_altered_signature_on_expired_token_is_bad_signature() {
    let app = TestApp::new();
    app.register("alice").await;
    let token = app.signin_token("alice").await;
    app.clock.advance(Duration::minutes(61));

    let sig_start = token.rfind('.').unwrap() + 1;
    let mut bytes = token.clone().into_bytes();
    bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
    let altered = String::from_utf8(bytes).unwrap();

    let err = app.manager.authenticate_request(Some(&cookie_header(&altered))).unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));

    let decoder = JwtDecoder::new(&app.config.auth, app.clock.clone());
    assert!(matches!(decoder.verify(&token), Err(TokenRejection::Expired { .. })));
    assert_eq!(decoder.verify(&altered), Err(TokenRejection::BadSignature));
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let app = TestApp::new();
    app.register("alice").await;

    let mut other_config = test_config();
    other_config.auth.jwt_secret = "a-completely-different-secret-0123456789".to_string();
    let other = TestApp::with_config(other_config);
    other.register("alice").await;
    let foreign = other.signin_token("alice").await;

    assert!(app.manager.authenticate_request(Some(&cookie_header(&foreign))).is_err());
}

#[tokio::test]
async fn test_unsigned_token_rejected() {
    let app = TestApp::new();
    app.register("alice").await;
    let token = app.signin_token("alice").await;
    let payload = token.split('.').nth(1).unwrap();

    // {"alg":"none","typ":"JWT"}
    let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{payload}.");
    assert!(app.manager.authenticate_request(Some(&cookie_header(&unsigned))).is_err());
}

#[tokio::test]
async fn test_missing_or_garbled_cookie_is_unauthenticated() {
    let app = TestApp::new();
    for header in [None, Some(""), Some("theme=dark"), Some("token="), Some("token=garbage")] {
        let err = app.manager.authenticate_request(header).unwrap_err();
        assert!(err.is(ErrorKind::Unauthenticated), "{header:?}");
        assert_eq!(err.message, "Authentication required");
    }
}

#[tokio::test]
async fn test_bearer_authentication() {
    let app = TestApp::new();
    let id = app.register("alice").await;
    let token = app.signin_token("alice").await;

    let identity = app
        .manager
        .authenticate_bearer(Some(&format!("Bearer {token}")))
        .unwrap();
    assert_eq!(identity.subject_id, id);

    assert!(app.manager.authenticate_bearer(Some(&format!("Basic {token}"))).is_err());
    assert!(app.manager.authenticate_bearer(None).is_err());
}

#[tokio::test]
async fn test_logout_is_stateless() {
    let app = TestApp::new();
    app.register("alice").await;
    let token = app.signin_token("alice").await;

    let cleared = app.manager.logout();
    assert!(cleared.starts_with("token=;"));
    assert!(cleared.contains("Max-Age=0"));

    // No revocation: the token itself remains valid until it expires.
    assert!(app.manager.authenticate_request(Some(&cookie_header(&token))).is_ok());
}

#[tokio::test]
async fn test_cookie_policy_from_config() {
    let mut config = test_config();
    config.auth.cookie_name = "abyss_session".to_string();
    config.auth.cookie_secure = true;
    config.auth.token_ttl_minutes = 15;
    let app = TestApp::with_config(config);
    app.register("alice").await;

    let result = app.manager.signin("alice", STRONG_PASSWORD).await.unwrap();
    let cookie = &result.token.set_cookie;
    assert!(cookie.starts_with("abyss_session="));
    assert!(cookie.ends_with("; Secure"));
    assert!(cookie.contains("Max-Age=900"));
    assert_eq!(result.token.expires_at, helpers::start_time() + Duration::minutes(15));

    let header = format!("abyss_session={}", result.token.token);
    assert!(app.manager.authenticate_request(Some(&header)).is_ok());
    assert!(
        app.manager
            .authenticate_request(Some(&cookie_header(&result.token.token)))
            .is_err()
    );
}
