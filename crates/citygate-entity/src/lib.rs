//! # citygate-entity
//!
//! Domain entity models for CityGate. Structs backed by a table row derive
//! `sqlx::FromRow`; everything that crosses the HTTP boundary serializes
//! with camelCase field names.

pub mod permission;
pub mod session;
pub mod user;
