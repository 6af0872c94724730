//! Language-model access.
//!
//! Handlers and the article generator talk to [`LanguageModel`] so tests can
//! swap in a fake; [`OpenAiClient`] is the production implementation.

pub mod openai;

pub use openai::OpenAiClient;

use crate::config::CompletionConfig;
use crate::Result;
use async_trait::async_trait;

/// Sampling parameters for a single completion call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&CompletionConfig> for CompletionOptions {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Remote text completion
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a single user prompt and return the generated text
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<String>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
