//! Stats command handler.

use crate::history::SqliteQueryStore;
use clap::Args;
use krishi_core::{config::AppConfig, AppError, AppResult};

/// Show usage statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = SqliteQueryStore::open(&config.history_path)?;
        let stats = store.stats()?;

        if self.json {
            let output = serde_json::json!({
                "totalQueries": stats.total_queries,
                "aiAnswered": stats.ai_answered,
                "distinctUsers": stats.distinct_users,
            });

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("Total queries:  {}", stats.total_queries);
            println!("AI answered:    {}", stats.ai_answered);
            println!("Distinct users: {}", stats.distinct_users);
        }

        Ok(())
    }
}
