//! Hashing schemes and stored-hash shape classification.

use std::fmt;
use std::str::FromStr;

use abyss_core::error::AppError;

/// Length of a bcrypt modular-crypt string (`$2b$10$` + 53 chars).
const BCRYPT_LEN: usize = 60;
/// Hex length of the scrypt salt (16 bytes).
pub(crate) const SCRYPT_SALT_HEX_LEN: usize = 32;
/// Hex length of the scrypt derived key (64 bytes).
pub(crate) const SCRYPT_KEY_HEX_LEN: usize = 128;

/// A password hashing scheme that can produce new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Cost-factor salted hash (`$2b$<cost>$...`).
    Bcrypt,
    /// Memory-hard argon2id (`$argon2id$v=19$m=..,t=..,p=..$...`).
    Argon2,
    /// Salted scrypt (`hex(salt):hex(key)`).
    Scrypt,
}

impl Scheme {
    /// Return the scheme's configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bcrypt => "bcrypt",
            Self::Argon2 => "argon2",
            Self::Scrypt => "scrypt",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = AppError;

    /// An unknown name is a programming or deployment fault, so it is a
    /// configuration error rather than a validation error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bcrypt" => Ok(Self::Bcrypt),
            "argon2" => Ok(Self::Argon2),
            "scrypt" => Ok(Self::Scrypt),
            _ => Err(AppError::configuration(format!(
                "Unsupported hashing scheme: '{s}'. Expected one of: bcrypt, argon2, scrypt"
            ))),
        }
    }
}

/// The scheme a stored hash belongs to, judged by its shape alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeTag {
    /// Matches `^\$2[aby]\$\d{2}\$[./A-Za-z0-9]{53}$`.
    Bcrypt,
    /// Starts with `$argon2`.
    Argon2,
    /// Matches `^[a-f0-9]{32}:[a-f0-9]{128}$`.
    Scrypt,
    /// No known shape. Always verifies false.
    Unknown,
}

impl SchemeTag {
    /// The scheme this tag routes to, if any.
    pub fn scheme(&self) -> Option<Scheme> {
        match self {
            Self::Bcrypt => Some(Scheme::Bcrypt),
            Self::Argon2 => Some(Scheme::Argon2),
            Self::Scrypt => Some(Scheme::Scrypt),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for SchemeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme() {
            Some(scheme) => write!(f, "{scheme}"),
            None => write!(f, "unknown"),
        }
    }
}

/// Classifies a stored hash by its public shape.
///
/// Only length and character classes are inspected, never secret content,
/// so classification time reveals nothing about the password.
pub fn classify(stored: &str) -> SchemeTag {
    if is_bcrypt_shape(stored) {
        SchemeTag::Bcrypt
    } else if stored.starts_with("$argon2") {
        SchemeTag::Argon2
    } else if is_scrypt_shape(stored) {
        SchemeTag::Scrypt
    } else {
        SchemeTag::Unknown
    }
}

fn is_bcrypt_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == BCRYPT_LEN
        && b[0] == b'$'
        && b[1] == b'2'
        && matches!(b[2], b'a' | b'b' | b'y')
        && b[3] == b'$'
        && b[4].is_ascii_digit()
        && b[5].is_ascii_digit()
        && b[6] == b'$'
        && b[7..]
            .iter()
            .all(|c| c.is_ascii_alphanumeric() || *c == b'.' || *c == b'/')
}

fn is_scrypt_shape(s: &str) -> bool {
    let Some((salt, key)) = s.split_once(':') else {
        return false;
    };
    salt.len() == SCRYPT_SALT_HEX_LEN
        && key.len() == SCRYPT_KEY_HEX_LEN
        && salt.bytes().chain(key.bytes()).all(is_lower_hex)
}

fn is_lower_hex(c: u8) -> bool {
    c.is_ascii_digit() || (b'a'..=b'f').contains(&c)
}
