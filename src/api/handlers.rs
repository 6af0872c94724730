use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    api::models::*,
    article::ArticleGenerator,
    config::{RetrievalConfig, ServiceMode, Settings},
    llm::{CompletionOptions, LanguageModel, OpenAiClient},
    retrieval::{FileCorpusLoader, Retrieval, RetrievalCapability},
    utils::extract_result_count,
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LanguageModel>,
    pub retrieval: RetrievalCapability,
    pub settings: Settings,
}

impl AppState {
    /// Wire up the OpenAI client and, in full mode, the recipe database
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(&settings.openai)?);

        let retrieval = match settings.mode {
            ServiceMode::Simple => RetrievalCapability::Unavailable,
            ServiceMode::Full => {
                let loader = FileCorpusLoader::new(
                    &settings.retrieval.embeddings_path,
                    &settings.retrieval.index_path,
                );
                let generator = ArticleGenerator::new(
                    client.clone(),
                    CompletionOptions::from(&settings.completion),
                );
                RetrievalCapability::Available(Arc::new(Retrieval::new(
                    Arc::new(loader),
                    client.clone(),
                    generator,
                )))
            }
        };

        Ok(Self {
            llm: client,
            retrieval,
            settings,
        })
    }

    fn fallback_summary(&self) -> &'static str {
        match self.settings.mode {
            ServiceMode::Full => FALLBACK_SUMMARY,
            ServiceMode::Simple => SIMPLE_SUMMARY,
        }
    }
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let full_system = match state.settings.mode {
        ServiceMode::Full => Some(state.retrieval.is_available()),
        ServiceMode::Simple => None,
    };

    Json(HealthResponse {
        status: HEALTH_STATUS.to_string(),
        message: HEALTH_MESSAGE.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        full_system,
    })
}

/// POST /recipe-query - Generate an article for a cooking query
pub async fn recipe_query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ArticleResponse>> {
    let query = parse_query(&body)
        .ok_or_else(|| Error::Validation("Query is required".to_string()))?;

    info!("Processing recipe query: {}", query);

    if let RetrievalCapability::Available(retrieval) = &state.retrieval {
        match retrieve_article(retrieval, &query, &state.settings.retrieval).await {
            Ok(Some(html)) => {
                info!("Article generated from recipe database");
                return Ok(Json(ArticleResponse::success(html, RETRIEVAL_SUMMARY)));
            }
            Ok(None) => info!("No matching recipes found, using fallback"),
            Err(e) => warn!("Recipe database unavailable, using fallback: {}", e.log_safe()),
        }
    }

    let options = CompletionOptions::from(&state.settings.completion);
    let html = state
        .llm
        .complete(&fallback_prompt(&query), options)
        .await
        .map_err(|e| Error::Generation(e.to_string()))?;

    Ok(Json(ArticleResponse::success(html, state.fallback_summary())))
}

/// Pull a non-empty `query` string out of a JSON object body
fn parse_query(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("query")?
        .as_str()
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// Retrieval path. `Ok(None)` means the search came back empty.
async fn retrieve_article(
    retrieval: &Retrieval,
    query: &str,
    config: &RetrievalConfig,
) -> Result<Option<String>> {
    if !retrieval.is_loaded() {
        debug!("Recipe database not loaded yet, loading now");
    }
    retrieval.load().await?;

    let k = extract_result_count(query, config.default_result_count).min(config.max_result_count);
    debug!("Searching recipe database for top {} matches", k);

    let recipes = retrieval.find_recipes(query, k).await?;
    if recipes.is_empty() {
        return Ok(None);
    }

    let html = retrieval.write_article(query, &recipes).await?;
    Ok(Some(html))
}

/// Prompt used when no recipe data backs the article
pub fn fallback_prompt(query: &str) -> String {
    format!(
        "Write a professional article about \"{query}\". 

Create a compelling article with:
- An engaging introduction
- 3-5 recipe sections with descriptions  
- Cooking tips
- A conclusion

Format the response as HTML with proper headings and paragraphs.
"
    )
}
