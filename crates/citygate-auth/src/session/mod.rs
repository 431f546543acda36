//! Cache-backed sessions and the token lifecycle built on them.

pub mod manager;
pub mod store;

pub use manager::{AuthOutcome, TokenService};
pub use store::SessionStore;
