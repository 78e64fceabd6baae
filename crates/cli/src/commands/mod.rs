//! Command handlers for the Krishi CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod history;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use history::HistoryCommand;
pub use stats::StatsCommand;
