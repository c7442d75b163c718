//! Dialdesk Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the dialdesk
//! server. This crate offers a builder pattern for creating test contexts with in-memory
//! SQLite databases, a migrated session store, and customizable table schemas.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection, session store and session
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Helpers for inserting entities with sensible defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::SessionActivity;
//!
//! #[tokio::test]
//! async fn test_activity() -> Result<(), TestError> {
//!     let mut test = TestBuilder::new()
//!         .with_table(SessionActivity)
//!         .build()
//!         .await?;
//!
//!     let store = test.session_store().await?;
//!     // Build a session layer on top of the store...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
