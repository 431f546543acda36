//! Domain permission entities.

pub mod model;

pub use model::DomainPermission;
