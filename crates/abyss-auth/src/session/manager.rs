//! Session lifecycle: registration, signin, request authentication, logout.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use abyss_core::config::AppConfig;
use abyss_core::error::{AppError, ErrorKind};
use abyss_core::result::AppResult;
use abyss_core::traits::{Clock, UserStore};
use abyss_core::types::{NewUserRecord, Role, SubjectId, UserView};

use crate::identifier::IdentifierFactory;
use crate::jwt::{IssuedToken, JwtDecoder, JwtEncoder, TokenRejection};
use crate::password::{PasswordHasher, PasswordValidator, Scheme};
use crate::random::RandomSource;

use super::cookie::{CookiePolicy, extract_bearer};
use super::state::{AuthState, Identity};

/// Verified against when the identity is unknown, so both signin failure
/// paths run one full verification.
const DUMMY_PASSWORD: &str = "abyss-dummy-credential";

/// Result of a successful signin.
#[derive(Debug, Clone, Serialize)]
pub struct SigninResult {
    /// Signed token and the cookie carrying it.
    pub token: IssuedToken,
    /// The signed-in user, without credential material.
    pub user: UserView,
}

/// Async facade over the credential core.
///
/// Password hashing and verification are CPU-bound and run on tokio's
/// blocking pool. Every credential or token failure reaches the caller as
/// one generic error; the cause is logged under the `audit` target.
#[derive(Clone)]
pub struct SessionManager {
    /// Multi-scheme password hasher.
    hasher: Arc<PasswordHasher>,
    /// Registration policy.
    validator: PasswordValidator,
    /// Token issuance.
    encoder: Arc<JwtEncoder>,
    /// Token verification.
    decoder: Arc<JwtDecoder>,
    /// Credential persistence.
    store: Arc<dyn UserStore>,
    /// Time source for record timestamps.
    clock: Arc<dyn Clock>,
    /// Subject id minting.
    ids: IdentifierFactory,
    /// Cookie naming and flags.
    cookies: CookiePolicy,
    /// Re-hash legacy credentials on signin.
    upgrade_legacy_hashes: bool,
    /// Default-scheme hash of [`DUMMY_PASSWORD`].
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("hasher", &self.hasher)
            .field("encoder", &self.encoder)
            .field("decoder", &self.decoder)
            .field("upgrade_legacy_hashes", &self.upgrade_legacy_hashes)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Builds the manager and its services from configuration.
    ///
    /// Fails with a configuration error when the auth, hashing, or
    /// identifier section is unusable. Computes one hash up front.
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn UserStore>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        config.auth.validate()?;
        config.identifier.validate()?;

        let hasher = Arc::new(PasswordHasher::new(&config.hashing, Arc::clone(&random))?);
        let ids = IdentifierFactory::new(&config.identifier, random, Arc::clone(&clock));
        let encoder = JwtEncoder::new(&config.auth, Arc::clone(&clock), ids.clone());
        let decoder = JwtDecoder::new(&config.auth, Arc::clone(&clock));
        let dummy_hash: Arc<str> = hasher.hash(DUMMY_PASSWORD, None)?.into();

        Ok(Self {
            validator: PasswordValidator::new(&config.auth, hasher.default_scheme()),
            cookies: CookiePolicy::from_config(&config.auth),
            upgrade_legacy_hashes: config.auth.upgrade_legacy_hashes,
            encoder: Arc::new(encoder),
            decoder: Arc::new(decoder),
            hasher,
            store,
            clock,
            ids,
            dummy_hash,
        })
    }

    /// Registers a new identity with the default hashing scheme.
    ///
    /// All failures are `ValidationError`s describing the caller's input,
    /// including an identity that is already taken.
    pub async fn register(
        &self,
        identity: &str,
        plaintext: &str,
        confirmation: &str,
    ) -> AppResult<SubjectId> {
        self.validator.validate_identity(identity)?;
        self.validator.validate_confirmation(plaintext, confirmation)?;
        self.validator.validate(identity, plaintext)?;

        if self.store.find_by_identity(identity).await?.is_some() {
            return Err(AppError::validation("Identity is already registered"));
        }

        let stored_hash = self.hash_blocking(plaintext, None).await?;
        let record = NewUserRecord {
            id: self.ids.subject_id(),
            identity: identity.to_string(),
            stored_hash,
            role: Role::User,
            created_at: self.clock.now(),
        };

        // A concurrent registration can win between lookup and insert.
        let subject_id = self.store.insert(record).await.map_err(|e| {
            if e.is(ErrorKind::Conflict) {
                AppError::validation("Identity is already registered")
            } else {
                e
            }
        })?;

        info!(subject_id = %subject_id, "User registered");
        Ok(subject_id)
    }

    /// Verifies credentials and issues a session token.
    ///
    /// Unknown identity and wrong password both yield the same
    /// `InvalidCredentials` error after the same amount of hashing work.
    pub async fn signin(&self, identity: &str, plaintext: &str) -> AppResult<SigninResult> {
        let Some(user) = self.store.find_by_identity(identity).await? else {
            let _ = self
                .verify_blocking(plaintext, self.dummy_hash.to_string())
                .await;
            warn!(target: "audit", "Signin rejected: unknown identity");
            return Err(AppError::invalid_credentials());
        };

        if !self
            .verify_blocking(plaintext, user.stored_hash.clone())
            .await
        {
            warn!(target: "audit", subject_id = %user.id, "Signin rejected: wrong password");
            return Err(AppError::invalid_credentials());
        }

        if self.upgrade_legacy_hashes && self.hasher.needs_rehash(&user.stored_hash) {
            self.upgrade_hash(&user.id, plaintext).await;
        }

        let token = self.encoder.issue(user.id, user.role)?;
        info!(subject_id = %user.id, "Signin successful");

        Ok(SigninResult {
            token,
            user: user.public_view(),
        })
    }

    /// Authenticates a request from its `Cookie` header.
    pub fn authenticate_request(&self, cookie_header: Option<&str>) -> AppResult<Identity> {
        let token = cookie_header.and_then(|h| self.cookies.extract(h));
        self.authenticate_token(token, "cookie")
    }

    /// Authenticates a request from its `Authorization` header.
    pub fn authenticate_bearer(&self, authorization: Option<&str>) -> AppResult<Identity> {
        let token = authorization.and_then(extract_bearer);
        self.authenticate_token(token, "bearer")
    }

    /// The request's authentication state, for handlers that serve both
    /// anonymous and signed-in callers.
    pub fn resolve_state(&self, cookie_header: Option<&str>) -> AuthState {
        self.authenticate_request(cookie_header)
            .map(AuthState::Authenticated)
            .unwrap_or_default()
    }

    /// Stateless logout: the `Set-Cookie` value that clears the session.
    ///
    /// Tokens already issued stay valid until they expire.
    pub fn logout(&self) -> String {
        self.cookies.expired_cookie()
    }

    /// The public view of the authenticated caller.
    pub async fn profile(&self, identity: &Identity) -> AppResult<UserView> {
        let user = self
            .store
            .find_by_id(&identity.subject_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(user.public_view())
    }

    fn authenticate_token(&self, token: Option<&str>, source: &'static str) -> AppResult<Identity> {
        let result = token
            .ok_or(TokenRejection::Missing)
            .and_then(|t| self.decoder.verify(t));

        match result {
            Ok(claims) => Ok(Identity {
                subject_id: claims.sub,
                role: claims.role,
            }),
            Err(TokenRejection::Missing) => {
                debug!(target: "audit", source, "No session token presented");
                Err(AppError::unauthenticated())
            }
            Err(rejection) => {
                warn!(target: "audit", source, cause = %rejection, "Session token rejected");
                Err(rejection.into())
            }
        }
    }

    async fn upgrade_hash(&self, subject_id: &SubjectId, plaintext: &str) {
        let upgraded = match self.hash_blocking(plaintext, None).await {
            Ok(hash) => hash,
            Err(e) => {
                error!(subject_id = %subject_id, error = %e, "Failed to re-hash legacy credential");
                return;
            }
        };
        match self.store.update_stored_hash(subject_id, &upgraded).await {
            Ok(()) => info!(
                subject_id = %subject_id,
                scheme = %self.hasher.default_scheme(),
                "Upgraded legacy credential"
            ),
            Err(e) => {
                error!(subject_id = %subject_id, error = %e, "Failed to store upgraded credential");
            }
        }
    }

    async fn hash_blocking(&self, plaintext: &str, scheme: Option<Scheme>) -> AppResult<String> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext, scheme))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    async fn verify_blocking(&self, plaintext: &str, stored_hash: String) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        match tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &stored_hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                error!(error = %e, "Verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::OsRandom;
    use crate::store::MemoryUserStore;
    use abyss_core::config::HashingConfig;
    use abyss_core::traits::ManualClock;
    use chrono::{Duration, Utc};

    const PASSWORD: &str = "violet-Kettle-93-orbit";

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "manager-test-secret-0123456789abcdef".to_string();
        config.hashing = HashingConfig {
            bcrypt_cost: 4,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..HashingConfig::default()
        };
        config
    }

    fn manager(clock: Arc<ManualClock>) -> SessionManager {
        let store = Arc::new(MemoryUserStore::new(clock.clone()));
        SessionManager::new(&config(), store, Arc::new(OsRandom), clock).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_signin() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let manager = manager(clock);
        let id = manager.register("alice", PASSWORD, PASSWORD).await.unwrap();

        let result = manager.signin("alice", PASSWORD).await.unwrap();
        assert_eq!(result.user.id, id);
        assert!(result.token.set_cookie.starts_with("token="));

        let cookie = format!("token={}", result.token.token);
        let identity = manager.authenticate_request(Some(&cookie)).unwrap();
        assert_eq!(identity.subject_id, id);
        assert_eq!(manager.profile(&identity).await.unwrap().identity, "alice");
    }

    #[tokio::test]
    async fn test_signin_failures_are_identical() {
        let manager = manager(Arc::new(ManualClock::new(Utc::now())));
        manager.register("alice", PASSWORD, PASSWORD).await.unwrap();

        let wrong = manager.signin("alice", "wrong-password").await.unwrap_err();
        let unknown = manager.signin("mallory", PASSWORD).await.unwrap_err();
        assert!(wrong.is(ErrorKind::InvalidCredentials));
        assert_eq!(wrong.kind, unknown.kind);
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn test_resolve_state_transitions() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let manager = manager(clock.clone());
        manager.register("alice", PASSWORD, PASSWORD).await.unwrap();

        assert_eq!(manager.resolve_state(None), AuthState::Unauthenticated);

        let token = manager.signin("alice", PASSWORD).await.unwrap().token.token;
        let cookie = format!("token={token}");
        assert!(manager.resolve_state(Some(&cookie)).is_authenticated());

        clock.advance(Duration::minutes(61));
        assert_eq!(manager.resolve_state(Some(&cookie)), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let manager = manager(Arc::new(ManualClock::new(Utc::now())));
        assert!(manager.logout().contains("Max-Age=0"));
    }

    #[test]
    fn test_new_rejects_placeholder_secret() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryUserStore::new(clock.clone()));
        let err = SessionManager::new(&AppConfig::default(), store, Arc::new(OsRandom), clock)
            .unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
