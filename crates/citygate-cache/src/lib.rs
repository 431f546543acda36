//! # citygate-cache
//!
//! Cache providers for CityGate sessions, refresh records, and per-domain
//! permission sets. Two backends:
//!
//! - **memory**: In-process store built on [dashmap](https://crates.io/crates/dashmap)
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration, and every
//! call goes through [`CacheManager`], which bounds it with a timeout.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
