//! History command handler.

use crate::history::SqliteQueryStore;
use clap::Args;
use krishi_core::{config::AppConfig, AppError, AppResult};

/// Show recent queries from the history database
#[derive(Args, Debug)]
pub struct HistoryCommand {
    /// Maximum number of entries to show
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,

    /// Show entries from all users, not just the configured one
    #[arg(long)]
    pub all_users: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = SqliteQueryStore::open(&config.history_path)?;

        let user_filter = if self.all_users {
            None
        } else {
            Some(config.user.as_str())
        };

        let entries = store.recent(user_filter, self.limit)?;

        if self.json {
            let output: Vec<serde_json::Value> = entries
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "id": entry.id,
                        "user": entry.user_id,
                        "query": entry.query,
                        "offlineResponse": entry.offline_response,
                        "aiResponse": entry.ai_response,
                        "createdAt": entry.created_at,
                    })
                })
                .collect();

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No queries recorded yet.");
            return Ok(());
        }

        for entry in &entries {
            let ai_marker = if entry.ai_response.is_some() {
                "ai"
            } else {
                "offline"
            };
            println!(
                "[{}] {} ({}, {}): {}",
                entry.id, entry.created_at, entry.user_id, ai_marker, entry.query
            );
        }

        Ok(())
    }
}
