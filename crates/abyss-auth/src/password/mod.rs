//! Password hashing, scheme detection, and registration policy.

pub mod hasher;
pub mod scheme;
pub mod validator;

pub use hasher::PasswordHasher;
pub use scheme::{Scheme, SchemeTag, classify};
pub use validator::PasswordValidator;
