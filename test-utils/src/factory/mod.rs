//! Factories for inserting test entities with sensible defaults.
//!
//! Each factory exposes a builder for customizing fields and a shorthand
//! `create_*` function for the common case.

pub mod helpers;
pub mod session_activity;

pub use session_activity::create_session_activity;
