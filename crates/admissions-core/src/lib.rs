//! Shared HTTP and persistence plumbing for admissions services.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
