use serde::{Deserialize, Serialize};

pub const RETRIEVAL_SUMMARY: &str = "Professional article generated with full recipe database";
pub const FALLBACK_SUMMARY: &str = "Article generated (fallback mode)";
pub const SIMPLE_SUMMARY: &str = "Recipe article generated successfully";

pub const HEALTH_STATUS: &str = "healthy";
pub const HEALTH_MESSAGE: &str = "Recipe API server is running!";

/// POST /recipe-query body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeQueryRequest {
    pub query: String,
}

/// Generated article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub success: bool,
    pub html: String,
    pub summary: String,
}

impl ArticleResponse {
    pub fn success(html: String, summary: &str) -> Self {
        Self {
            success: true,
            html,
            summary: summary.to_string(),
        }
    }
}

/// Error body for failed generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_system: Option<bool>,
}
