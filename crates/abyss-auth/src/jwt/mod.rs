//! Signed, time-bound session tokens (HS256).

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::{JwtDecoder, TokenRejection};
pub use encoder::{IssuedToken, JwtEncoder};
