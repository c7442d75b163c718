//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models so the
//! pipeline stages never depend on the database schema.

pub mod session_activity;

#[cfg(test)]
mod test;
