//! Shared domain types.

pub mod id;
pub mod role;
pub mod user;

pub use id::{SubjectId, TokenId};
pub use role::Role;
pub use user::{NewUserRecord, UserRecord, UserView};
