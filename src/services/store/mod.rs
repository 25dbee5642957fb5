pub mod client;
#[cfg(test)]
pub mod memory;
pub mod valkey;

pub use client::{FlagStore, StoreError, TokenStore};
pub use valkey::ValkeyClient;
