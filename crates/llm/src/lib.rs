//! Krishi LLM Library
//!
//! Text-generation client abstraction and the watsonx.ai provider.
//! The rest of the application talks to the [`TextGenerator`] trait so
//! tests can substitute in-process fakes for the remote service.

pub mod client;
pub mod factory;
pub mod providers;

pub use client::{GenerationParams, GenerationRequest, TextGenerator};
pub use factory::create_generator;
pub use providers::WatsonxClient;
