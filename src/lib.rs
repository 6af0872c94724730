pub mod config;
pub mod error;

pub mod llm;
pub mod retrieval;
pub mod article;

pub mod api;
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
