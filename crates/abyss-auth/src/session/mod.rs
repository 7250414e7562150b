//! Signin, registration, and per-request authentication.

pub mod cookie;
pub mod manager;
pub mod state;

pub use cookie::{CookiePolicy, extract_bearer, extract_cookie};
pub use manager::{SessionManager, SigninResult};
pub use state::{AuthState, Identity};
