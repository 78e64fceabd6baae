//! Text-generation provider implementations.

pub mod watsonx;

pub use watsonx::WatsonxClient;
