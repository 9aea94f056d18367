//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`downloads`] - Download and cleanup
//! - [`system`] - Health, events, OpenAPI, site fallback

mod downloads;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use downloads::*;
pub use system::*;
