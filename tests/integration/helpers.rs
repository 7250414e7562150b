//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use abyss_auth::random::OsRandom;
use abyss_auth::session::SessionManager;
use abyss_auth::store::MemoryUserStore;
use abyss_core::config::{AppConfig, HashingConfig};
use abyss_core::traits::ManualClock;
use abyss_core::types::SubjectId;

/// Password that passes the default strength policy.
pub const STRONG_PASSWORD: &str = "violet-Kettle-93-orbit";

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test application context
pub struct TestApp {
    /// The session manager under test
    pub manager: SessionManager,
    /// Backing store, for direct inspection
    pub store: Arc<MemoryUserStore>,
    /// Controllable clock shared by every service
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with fast hashing parameters
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from a modified configuration
    pub fn with_config(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::new(start_time()));
        let store = Arc::new(MemoryUserStore::new(clock.clone()));
        let manager = SessionManager::new(&config, store.clone(), Arc::new(OsRandom), clock.clone())
            .expect("Failed to build session manager");

        Self {
            manager,
            store,
            clock,
            config,
        }
    }

    /// Register a user with [`STRONG_PASSWORD`]
    pub async fn register(&self, identity: &str) -> SubjectId {
        self.manager
            .register(identity, STRONG_PASSWORD, STRONG_PASSWORD)
            .await
            .expect("Failed to register test user")
    }

    /// Sign in with [`STRONG_PASSWORD`] and return the raw token
    pub async fn signin_token(&self, identity: &str) -> String {
        self.manager
            .signin(identity, STRONG_PASSWORD)
            .await
            .expect("Failed to sign in")
            .token
            .token
    }
}

/// Valid configuration with cheap hashing costs.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.hashing = HashingConfig {
        bcrypt_cost: 4,
        argon2_memory_kib: 1024,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..HashingConfig::default()
    };
    config.cipher.key_hex = Some("3c".repeat(32));
    config
}

/// Fixed starting instant for the manual clock.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
}

/// A `Cookie` header carrying `token` among unrelated cookies.
pub fn cookie_header(token: &str) -> String {
    format!("theme=dark; token={token}; lang=en")
}
