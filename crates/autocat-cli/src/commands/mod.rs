//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `classify` - Classification and learning commands
//! - `rules` - Rule management commands
//! - `serve` - Web server command

pub mod classify;
pub mod core;
pub mod rules;
pub mod serve;

// Re-export command functions for main.rs
pub use classify::*;
pub use core::*;
pub use rules::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render an optional field for table output
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
