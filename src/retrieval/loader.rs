use crate::retrieval::{CorpusLoader, RecipeRecord, VectorIndex};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads the corpus and index from JSON files on disk
#[derive(Debug, Clone)]
pub struct FileCorpusLoader {
    embeddings_path: PathBuf,
    index_path: PathBuf,
}

impl FileCorpusLoader {
    pub fn new(embeddings_path: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            embeddings_path: embeddings_path.into(),
            index_path: index_path.into(),
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Retrieval(format!("Failed to read {}: {e}", path.display())))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::Retrieval(format!("Failed to parse {}: {e}", path.display())))
}

#[async_trait]
impl CorpusLoader for FileCorpusLoader {
    async fn load_embeddings(&self) -> Result<Vec<RecipeRecord>> {
        debug!("Loading recipe embeddings from {:?}", self.embeddings_path);
        read_json(&self.embeddings_path).await
    }

    async fn load_index(&self) -> Result<VectorIndex> {
        debug!("Loading vector index from {:?}", self.index_path);
        let index: VectorIndex = read_json(&self.index_path).await?;
        index.validate()?;
        Ok(index)
    }
}

/// Build the id -> recipe lookup table. Later duplicates win.
pub fn get_id_to_recipe(recipes: &[RecipeRecord]) -> HashMap<String, RecipeRecord> {
    let mut map = HashMap::with_capacity(recipes.len());
    for recipe in recipes {
        if map.insert(recipe.id.clone(), recipe.clone()).is_some() {
            warn!("Duplicate recipe id in corpus: {}", recipe.id);
        }
    }
    map
}
