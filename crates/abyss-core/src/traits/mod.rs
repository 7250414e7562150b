//! Collaborator traits defined in `abyss-core` and implemented elsewhere.

pub mod clock;
pub mod user_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use user_store::UserStore;
