//! Server bootstrap and request lifecycle.
//!
//! This module contains the process startup sequence and the per-request pipeline that
//! every feature router is mounted into. The backend uses Axum as the web framework,
//! SeaORM for database operations and tower-sessions for session persistence.
//!
//! # Startup order
//!
//! 1. **Config** (`config`) - Environment settings; missing mandatory values abort startup
//! 2. **Database** (`startup`) - Connection pool and migrations
//! 3. **Sessions** (`startup`) - Session store on the same pool, signed cookie layer
//! 4. **Pipeline** (`router`) - Stage list assembled once
//! 5. **Listener** (`startup`) - Socket bound only after the steps above succeed
//!
//! # Request flow
//!
//! 1. Body limit, request scope and panic barrier (`fault`)
//! 2. Static assets from the public directory
//! 3. Session load or creation (`middleware::session`)
//! 4. Session activity counter and log (`middleware::activity`)
//! 5. Feature routers in mount order (`feature`)
//! 6. Landing view (`controller::landing`)
//! 7. Not found (`controller::fallback`)
//!
//! Errors returned from any stage become a generic 500 via `error::AppError`. Panics and
//! background failures outside request handling terminate the process (`fault`).

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod extract;
pub mod fault;
pub mod feature;
pub mod middleware;
pub mod model;
pub mod router;
pub mod startup;
pub mod state;

#[cfg(test)]
mod test;
