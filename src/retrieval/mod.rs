//! Retrieval subsystem: recipe corpus, vector index, k-NN search and the
//! process-lifetime cache that holds them.
//!
//! The corpus and index files are produced by an offline pipeline; this module
//! only loads and queries them.

pub mod cache;
pub mod index;
pub mod loader;
pub mod search;

// Re-exports
pub use cache::{CacheState, RecipeCache};
pub use index::{cosine_similarity, IndexHit, VectorIndex};
pub use loader::{get_id_to_recipe, FileCorpusLoader};
pub use search::search;

use crate::article::ArticleGenerator;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// A recipe from the corpus, together with its precomputed embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

/// Corpus files use both numeric and string identifiers
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Turns query text into a vector in the same space as the corpus
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Source of the recipe corpus and its search index
#[async_trait]
pub trait CorpusLoader: Send + Sync {
    /// Load every recipe together with its embedding
    async fn load_embeddings(&self) -> Result<Vec<RecipeRecord>>;

    /// Load the nearest-neighbour index built over those embeddings
    async fn load_index(&self) -> Result<VectorIndex>;
}

/// Everything the retrieval path needs, bundled behind one handle
pub struct Retrieval {
    loader: Arc<dyn CorpusLoader>,
    embedder: Arc<dyn Embedder>,
    generator: ArticleGenerator,
    cache: RecipeCache,
}

impl Retrieval {
    pub fn new(
        loader: Arc<dyn CorpusLoader>,
        embedder: Arc<dyn Embedder>,
        generator: ArticleGenerator,
    ) -> Self {
        Self {
            loader,
            embedder,
            generator,
            cache: RecipeCache::new(),
        }
    }

    /// Populate the cache on first use. A failed load leaves it empty.
    pub async fn load(&self) -> Result<&CacheState> {
        self.cache.get_or_load(self.loader.as_ref()).await
    }

    /// Whether the corpus has been loaded into this process
    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    /// Top `k` recipes for the query, best match first
    pub async fn find_recipes(&self, query: &str, k: usize) -> Result<Vec<RecipeRecord>> {
        let state = self.load().await?;
        search(query, state.index(), state.id_map(), k, self.embedder.as_ref()).await
    }

    /// Write an article grounded in the given recipes
    pub async fn write_article(&self, query: &str, recipes: &[RecipeRecord]) -> Result<String> {
        self.generator
            .generate_professional_article(query, recipes)
            .await
    }
}

/// Whether this process can use the recipe database at all.
/// Decided once at startup.
#[derive(Clone)]
pub enum RetrievalCapability {
    Unavailable,
    Available(Arc<Retrieval>),
}

impl RetrievalCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, RetrievalCapability::Available(_))
    }
}
