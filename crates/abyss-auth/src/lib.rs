//! # abyss-auth
//!
//! The credential and secret-management core.
//!
//! ## Modules
//!
//! - `random`: the single injectable source of entropy
//! - `constant_time`: fixed-time equality for secrets
//! - `password`: multi-scheme hashing (bcrypt, argon2id, scrypt) and registration policy
//! - `cipher`: AES-256-CBC secret encryption and the `SecretVault` boundary
//! - `identifier`: UUIDs, tokens, nano ids, and slugs
//! - `jwt`: HS256 session token issuance and verification
//! - `session`: cookie handling and the async `SessionManager`
//! - `store`: in-memory `UserStore`

pub mod cipher;
pub mod constant_time;
pub mod identifier;
pub mod jwt;
pub mod password;
pub mod random;
pub mod session;
pub mod store;

mod kdf;

pub use cipher::{DerivedKey, EncryptedBlob, SecretVault, SymmetricCipher};
pub use constant_time::{constant_time_eq, safe_compare};
pub use identifier::{IdentifierFactory, SlugOptions, TokenEncoding, TokenSet};
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder, TokenRejection};
pub use password::{PasswordHasher, PasswordValidator, Scheme, SchemeTag};
pub use random::{OsRandom, RandomSource, SeededRandom};
pub use session::{AuthState, Identity, SessionManager, SigninResult};
pub use store::MemoryUserStore;
