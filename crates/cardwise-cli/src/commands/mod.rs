//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Spending analysis from a file or linked accounts
//! - `serve` - Web server command
//! - `simulate` - Payoff simulation
//! - `status` - Configuration status plus the `classify` and `risk` lookups

pub mod analyze;
pub mod serve;
pub mod simulate;
pub mod status;

// Re-export command functions for main.rs
pub use analyze::*;
pub use serve::*;
pub use simulate::*;
pub use status::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
