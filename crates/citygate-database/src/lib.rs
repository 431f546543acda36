//! # citygate-database
//!
//! Credential store for CityGate: the [`CredentialStore`] trait the auth
//! services depend on, a PostgreSQL implementation backed by repositories,
//! and an in-memory implementation for tests and local development.

pub mod connection;
pub mod factory;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use factory::open_store;
pub use memory::MemoryCredentialStore;
pub use store::{CredentialStore, PgCredentialStore};
