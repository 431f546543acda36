//! # citygate-auth
//!
//! Authentication, session management, and request authorization for
//! CityGate.
//!
//! ## Modules
//!
//! - `jwt`: signed access and refresh token encoding and decoding
//! - `password`: Argon2id hashing and password policy
//! - `session`: the cache-backed session store and the token service
//! - `authorize`: bearer header → [`Principal`](citygate_entity::session::Principal) resolution
//! - `registration`: validated sign-up input

pub mod authorize;
pub mod error;
pub mod jwt;
pub mod password;
pub mod registration;
pub mod session;

pub use authorize::Authorizer;
pub use error::AuthError;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use registration::Registration;
pub use session::{AuthOutcome, SessionStore, TokenService};
