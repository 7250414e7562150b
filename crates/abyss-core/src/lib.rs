//! # abyss-core
//!
//! Core crate for the Abyss credential core. Contains the collaborator
//! traits (user store, clock), configuration schemas, typed identifiers,
//! user records, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Abyss crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
