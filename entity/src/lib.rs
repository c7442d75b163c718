//! SeaORM entities for the dialdesk datastore.
//!
//! The session records themselves are owned by `tower-sessions-sqlx-store`; the
//! entities here cover the tables the application manages directly.

pub mod prelude;

pub mod session_activity;
