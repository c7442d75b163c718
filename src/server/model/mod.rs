//! Server-side domain models.
//!
//! Domain models are converted from entity models at the repository boundary, keeping the
//! middleware and controllers independent from the database schema.

pub mod session;
