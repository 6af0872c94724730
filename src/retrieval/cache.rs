use crate::retrieval::{get_id_to_recipe, CorpusLoader, RecipeRecord, VectorIndex};
use crate::{Error, Result};
use std::collections::HashMap;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// The loaded corpus: recipes, their index and the id lookup table.
/// Only ever built as a whole.
#[derive(Debug)]
pub struct CacheState {
    recipes: Vec<RecipeRecord>,
    index: VectorIndex,
    id_map: HashMap<String, RecipeRecord>,
}

impl CacheState {
    /// Assemble a state, rejecting an index that does not match the recipes
    pub fn new(recipes: Vec<RecipeRecord>, index: VectorIndex) -> Result<Self> {
        let id_map = get_id_to_recipe(&recipes);

        if let Some(missing) = index.ids.iter().find(|id| !id_map.contains_key(*id)) {
            return Err(Error::Retrieval(format!(
                "Index references unknown recipe id: {missing}"
            )));
        }

        if let Some(bad) = recipes
            .iter()
            .find(|r| !r.embedding.is_empty() && r.embedding.len() != index.dims)
        {
            return Err(Error::Retrieval(format!(
                "Recipe {} has {} embedding dimensions, index expects {}",
                bad.id,
                bad.embedding.len(),
                index.dims
            )));
        }

        Ok(Self {
            recipes,
            index,
            id_map,
        })
    }

    /// Run the three load steps in order
    pub async fn load(loader: &dyn CorpusLoader) -> Result<Self> {
        let recipes = loader.load_embeddings().await?;
        let index = loader.load_index().await?;
        Self::new(recipes, index)
    }

    pub fn recipes(&self) -> &[RecipeRecord] {
        &self.recipes
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn id_map(&self) -> &HashMap<String, RecipeRecord> {
        &self.id_map
    }
}

/// Process-lifetime holder for [`CacheState`].
///
/// Concurrent first callers wait on a single load. A successful load is kept
/// for good; a failed one leaves the cache empty so the next call tries again.
#[derive(Debug, Default)]
pub struct RecipeCache {
    cell: OnceCell<CacheState>,
}

impl RecipeCache {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get_or_load(&self, loader: &dyn CorpusLoader) -> Result<&CacheState> {
        self.cell
            .get_or_try_init(|| async {
                match CacheState::load(loader).await {
                    Ok(state) => {
                        info!(
                            "Recipe database loaded: {} recipes, {} indexed vectors",
                            state.recipes.len(),
                            state.index.len()
                        );
                        Ok(state)
                    }
                    Err(e) => {
                        error!("Failed to load recipe database: {:?}", e);
                        Err(e)
                    }
                }
            })
            .await
    }
}
