//! Integration tests for registration and signin.

mod helpers;

use std::sync::Arc;

use abyss_auth::password::{PasswordHasher, Scheme, SchemeTag, classify};
use abyss_auth::random::OsRandom;
use abyss_core::error::ErrorKind;
use abyss_core::traits::UserStore;
use abyss_core::types::{NewUserRecord, Role, SubjectId};
use helpers::{STRONG_PASSWORD, TestApp, cookie_header, test_config};
use uuid::Uuid;

async fn insert_legacy_user(app: &TestApp, identity: &str, scheme: Scheme) -> SubjectId {
    let hasher = PasswordHasher::new(&app.config.hashing, Arc::new(OsRandom)).unwrap();
    let record = NewUserRecord {
        id: SubjectId::from_uuid(Uuid::new_v4()),
        identity: identity.to_string(),
        stored_hash: hasher.hash(STRONG_PASSWORD, Some(scheme)).unwrap(),
        role: Role::User,
        created_at: helpers::start_time(),
    };
    app.store.insert(record).await.unwrap()
}

#[tokio::test]
async fn test_signin_and_cookie_authentication() {
    let app = TestApp::new();
    let id = app.register("alice").await;

    let result = app.manager.signin("alice", STRONG_PASSWORD).await.unwrap();
    assert_eq!(result.user.id, id);
    assert_eq!(result.user.identity, "alice");
    assert!(result.token.set_cookie.contains("HttpOnly"));
    assert!(result.token.set_cookie.contains("SameSite=Strict"));
    assert!(result.token.set_cookie.contains("Max-Age=3600"));

    let header = cookie_header(&result.token.token);
    let identity = app.manager.authenticate_request(Some(&header)).unwrap();
    assert_eq!(identity.subject_id, id);
    assert_eq!(identity.role, Role::User);

    let mut tampered = result.token.token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });
    let err = app
        .manager
        .authenticate_request(Some(&cookie_header(&tampered)))
        .unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));
}

#[tokio::test]
async fn test_signin_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("alice").await;

    let wrong = app.manager.signin("alice", "not-the-password").await.unwrap_err();
    let unknown = app.manager.signin("nobody", STRONG_PASSWORD).await.unwrap_err();

    assert!(wrong.is(ErrorKind::InvalidCredentials));
    assert!(unknown.is(ErrorKind::InvalidCredentials));
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let mismatch = app
        .manager
        .register("alice", STRONG_PASSWORD, "violet-Kettle-93-orbiT")
        .await
        .unwrap_err();
    assert!(mismatch.is(ErrorKind::Validation));

    let weak = app.manager.register("alice", "password", "password").await.unwrap_err();
    assert!(weak.is(ErrorKind::Validation));

    let short = app.manager.register("alice", "aB3$", "aB3$").await.unwrap_err();
    assert!(short.is(ErrorKind::Validation));

    let bad_identity = app
        .manager
        .register("al ice", STRONG_PASSWORD, STRONG_PASSWORD)
        .await
        .unwrap_err();
    assert!(bad_identity.is(ErrorKind::Validation));

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_duplicate_identity_is_validation_error() {
    let app = TestApp::new();
    app.register("alice").await;

    let err = app
        .manager
        .register("alice", STRONG_PASSWORD, STRONG_PASSWORD)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_registration_admits_one() {
    let app = TestApp::new();
    let attempts = (0..8).map(|_| {
        app.manager
            .register("alice", STRONG_PASSWORD, STRONG_PASSWORD)
    });
    let results = futures::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(err.is(ErrorKind::Validation));
    }
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_concurrent_signins_issue_distinct_tokens() {
    let app = TestApp::new();
    app.register("alice").await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let manager = app.manager.clone();
        handles.push(tokio::spawn(async move {
            manager.signin("alice", STRONG_PASSWORD).await
        }));
    }

    let mut tokens = std::collections::HashSet::new();
    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        tokens.insert(result.token.token);
    }
    assert_eq!(tokens.len(), 10);
}

#[tokio::test]
async fn test_legacy_schemes_still_verify() {
    let app = TestApp::new();
    insert_legacy_user(&app, "arthur", Scheme::Argon2).await;
    insert_legacy_user(&app, "sandra", Scheme::Scrypt).await;

    assert!(app.manager.signin("arthur", STRONG_PASSWORD).await.is_ok());
    assert!(app.manager.signin("sandra", STRONG_PASSWORD).await.is_ok());

    // Upgrade is off by default: stored hashes are untouched.
    let arthur = app.store.find_by_identity("arthur").await.unwrap().unwrap();
    assert_eq!(classify(&arthur.stored_hash), SchemeTag::Argon2);
}

#[tokio::test]
async fn test_legacy_hash_upgraded_on_signin() {
    let mut config = test_config();
    config.auth.upgrade_legacy_hashes = true;
    let app = TestApp::with_config(config);
    let id = insert_legacy_user(&app, "sandra", Scheme::Scrypt).await;

    app.manager.signin("sandra", STRONG_PASSWORD).await.unwrap();

    let record = app.store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(classify(&record.stored_hash), SchemeTag::Bcrypt);
    assert!(app.manager.signin("sandra", STRONG_PASSWORD).await.is_ok());
}

#[tokio::test]
async fn test_failed_signin_does_not_upgrade() {
    let mut config = test_config();
    config.auth.upgrade_legacy_hashes = true;
    let app = TestApp::with_config(config);
    let id = insert_legacy_user(&app, "sandra", Scheme::Scrypt).await;

    assert!(app.manager.signin("sandra", "wrong-password").await.is_err());

    let record = app.store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(classify(&record.stored_hash), SchemeTag::Scrypt);
}

#[tokio::test]
async fn test_profile_hides_credentials() {
    let app = TestApp::new();
    app.register("alice").await;
    let token = app.signin_token("alice").await;
    let identity = app
        .manager
        .authenticate_request(Some(&cookie_header(&token)))
        .unwrap();

    let profile = app.manager.profile(&identity).await.unwrap();
    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["identity"], "alice");
    assert!(json.get("stored_hash").is_none());
}
