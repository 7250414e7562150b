//! [`UserStore`](abyss_core::traits::UserStore) implementations.

pub mod memory;

pub use memory::MemoryUserStore;
