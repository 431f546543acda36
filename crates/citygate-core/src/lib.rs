//! # citygate-core
//!
//! Core crate for CityGate. Contains configuration schemas, the cache
//! provider trait, the clock abstraction used for token expiry, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other CityGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
