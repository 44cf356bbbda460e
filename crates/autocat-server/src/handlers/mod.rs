//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod classify;
pub mod rules;

// Re-export all handlers for use in router
pub use classify::*;
pub use rules::*;
