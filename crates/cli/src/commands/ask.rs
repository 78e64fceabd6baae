//! Ask command handler.
//!
//! Answers an agricultural question from the knowledge base, with AI
//! augmentation when watsonx.ai credentials are configured.

use crate::history::SqliteQueryStore;
use clap::Args;
use krishi_core::{config::AppConfig, AppError, AppResult};
use krishi_knowledge::{
    create_provider, Augmenter, KnowledgeBase, QueryEngine, Retriever,
};
use krishi_llm::create_generator;
use std::path::PathBuf;

/// Ask an agricultural question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: Option<String>,

    /// Read the question from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Number of knowledge-base statements to retrieve
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Do not record this query in the history database
    #[arg(long)]
    pub no_save: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let query = self
            .get_query()
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        tracing::debug!("Query: {}", query);

        let engine = build_engine(config, self.top_k).await?;

        let answer = if self.no_save {
            engine.answer(&query).await?
        } else {
            let store = SqliteQueryStore::open(&config.history_path)?;
            engine.handle(&config.user, &query, &store).await?
        };

        if self.json {
            let json = serde_json::to_string_pretty(&answer)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("Offline answer:");
            println!("{}", answer.offline_response);

            match answer.ai_response.text() {
                Some(text) => {
                    println!();
                    println!("AI answer:");
                    println!("{}", text);
                }
                None => {
                    tracing::info!("AI answer unavailable, offline answer only");
                }
            }
        }

        Ok(())
    }

    /// Get the question text from the positional argument or a file.
    fn get_query(&self) -> Option<String> {
        self.query.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                    .ok()
                    .map(|s| s.trim().to_string())
            })
        })
    }
}

/// Assemble the query engine from configuration.
///
/// Loads the knowledge base, embeds it, and wires up the optional
/// generation client.
pub async fn build_engine(config: &AppConfig, top_k: Option<usize>) -> AppResult<QueryEngine> {
    let base = match &config.knowledge_path {
        Some(path) => KnowledgeBase::load(path)?,
        None => KnowledgeBase::builtin(),
    };

    let provider = create_provider(&config.embedding).await?;
    let retriever = Retriever::build(provider, base).await?;

    let generator = create_generator(&config.watsonx)?;
    let augmenter = Augmenter::new(generator);

    let engine = QueryEngine::new(retriever, augmenter);
    Ok(engine.with_top_k(top_k.unwrap_or(config.top_k)))
}
