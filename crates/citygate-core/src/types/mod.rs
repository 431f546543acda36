//! Core type definitions used across the CityGate workspace.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
