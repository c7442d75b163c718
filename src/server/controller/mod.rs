//! HTTP handlers owned by the pipeline itself.
//!
//! Feature endpoints live in the feature routers; the pipeline only serves the landing
//! view and the terminal not-found response.

pub mod fallback;
pub mod landing;
