//! Expiring key/value storage.

mod memory;

pub use memory::InMemoryCache;
