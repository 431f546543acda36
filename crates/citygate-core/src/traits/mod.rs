//! Core traits defined in `citygate-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
