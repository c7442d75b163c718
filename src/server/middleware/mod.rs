//! Request pipeline middleware.
//!
//! - `session` - Typed accessors over the tower-sessions `Session`
//! - `activity` - Session activity stage (counter + creation/access log)

pub mod activity;
pub mod session;
