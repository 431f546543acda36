//! Session and credential value objects.

pub mod principal;
pub mod token;

pub use principal::Principal;
pub use token::AuthTokenPair;
