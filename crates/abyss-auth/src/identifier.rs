//! UUID, token, nano id, and slug generation.
//!
//! Every identifier draws from the injected [`RandomSource`]. Uniqueness is
//! probabilistic only; nothing here consults a registry of issued values.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid, Variant};

use abyss_core::config::IdentifierConfig;
use abyss_core::traits::Clock;
use abyss_core::types::{SubjectId, TokenId};

use crate::random::RandomSource;

const BASE62: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// URL-safe 64-symbol alphabet. A power of two, so masking is unbiased.
const NANO_ALPHABET: &[u8; 64] =
    b"_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default nano id length.
pub const DEFAULT_NANO_ID_LEN: usize = 21;

/// Length of the random part of a slug.
const SLUG_TOKEN_LEN: usize = 8;

/// Text encoding for [`IdentifierFactory::random_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenEncoding {
    /// Lowercase hex, two characters per byte.
    #[default]
    Hex,
    /// Standard padded base64.
    Base64,
}

/// Parts of a slug besides its random suffix.
#[derive(Debug, Clone, Default)]
pub struct SlugOptions {
    /// Leading component, omitted when `None` or empty.
    pub prefix: Option<String>,
    /// Insert the current UTC date as `YYYYMMDD`.
    pub include_date: bool,
}

/// One of each identifier kind, generated together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Time-ordered UUID.
    pub uuid: Uuid,
    /// 12-character nano id.
    pub short_id: String,
    /// 32 random bytes, hex encoded.
    pub token: String,
    /// `id_YYYYMMDD_xxxxxxxx`.
    pub slug: String,
}

/// Generates identifiers of every kind from one random source and clock.
#[derive(Clone)]
pub struct IdentifierFactory {
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    default_length: usize,
}

impl std::fmt::Debug for IdentifierFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierFactory")
            .field("default_length", &self.default_length)
            .finish_non_exhaustive()
    }
}

impl IdentifierFactory {
    /// Creates a factory from configuration.
    pub fn new(
        config: &IdentifierConfig,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            random,
            clock,
            default_length: config.default_token_length,
        }
    }

    /// Default token length in bytes.
    pub fn default_length(&self) -> usize {
        self.default_length
    }

    /// Random (version 4) UUID.
    pub fn uuid_v4(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.random.fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Time-ordered (version 7) UUID stamped from the injected clock.
    pub fn uuid_v7(&self) -> Uuid {
        let millis = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        let mut tail = [0u8; 10];
        self.random.fill_bytes(&mut tail);
        Builder::from_unix_timestamp_millis(millis, &tail).into_uuid()
    }

    /// A fresh subject id.
    pub fn subject_id(&self) -> SubjectId {
        SubjectId::from_uuid(self.uuid_v7())
    }

    /// A fresh token id.
    pub fn token_id(&self) -> TokenId {
        TokenId::from_uuid(self.uuid_v4())
    }

    /// `len` random bytes rendered in `encoding`.
    pub fn random_token(&self, len: usize, encoding: TokenEncoding) -> String {
        let bytes = self.random.bytes(len);
        match encoding {
            TokenEncoding::Hex => hex::encode(bytes),
            TokenEncoding::Base64 => STANDARD.encode(bytes),
        }
    }

    /// Hex token of the configured default length.
    pub fn default_token(&self) -> String {
        self.random_token(self.default_length, TokenEncoding::Hex)
    }

    /// One base62 character per random byte.
    ///
    /// Each byte is reduced modulo 62, so the first eight symbols are
    /// slightly more likely than the rest. Fine for slugs and display
    /// tokens; use [`Self::random_token`] for secrets.
    pub fn base62_token(&self, len: usize) -> String {
        self.random
            .bytes(len)
            .into_iter()
            .map(|b| BASE62[usize::from(b) % BASE62.len()] as char)
            .collect()
    }

    /// URL-safe nano id of `len` characters.
    pub fn nano_id(&self, len: usize) -> String {
        self.random
            .bytes(len)
            .into_iter()
            .map(|b| NANO_ALPHABET[usize::from(b & 63)] as char)
            .collect()
    }

    /// `prefix_YYYYMMDD_xxxxxxxx`, with absent parts omitted.
    pub fn slug(&self, options: &SlugOptions) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(prefix) = options.prefix.as_deref().filter(|p| !p.is_empty()) {
            parts.push(prefix.to_string());
        }
        if options.include_date {
            parts.push(self.clock.now().format("%Y%m%d").to_string());
        }
        parts.push(self.base62_token(SLUG_TOKEN_LEN));
        parts.join("_")
    }

    /// Generates one identifier of each kind.
    pub fn token_set(&self) -> TokenSet {
        TokenSet {
            uuid: self.uuid_v7(),
            short_id: self.nano_id(12),
            token: self.random_token(32, TokenEncoding::Hex),
            slug: self.slug(&SlugOptions {
                prefix: Some("id".to_string()),
                include_date: true,
            }),
        }
    }
}

/// Whether `input` is a hyphenated UUID with a known version and the
/// RFC 4122 variant. The nil and max UUIDs are accepted.
pub fn is_valid_uuid(input: &str) -> bool {
    parse_hyphenated(input).is_some()
}

/// Whether `input` is a valid version 4 UUID.
pub fn is_uuid_v4(input: &str) -> bool {
    parse_hyphenated(input).is_some_and(|u| u.get_version_num() == 4)
}

/// Whether `input` is a valid version 7 UUID.
pub fn is_uuid_v7(input: &str) -> bool {
    parse_hyphenated(input).is_some_and(|u| u.get_version_num() == 7)
}

fn parse_hyphenated(input: &str) -> Option<Uuid> {
    if input.len() != 36 {
        return None;
    }
    let uuid = Uuid::try_parse(input).ok()?;
    if uuid.is_nil() || uuid.as_u128() == u128::MAX {
        return Some(uuid);
    }
    let versioned = (1..=8).contains(&uuid.get_version_num());
    (versioned && uuid.get_variant() == Variant::RFC4122).then_some(uuid)
}
