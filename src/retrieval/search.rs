use crate::retrieval::{Embedder, RecipeRecord, VectorIndex};
use crate::Result;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Find the `k` recipes closest to the query text, best match first.
///
/// Index entries whose id has no recipe are skipped, so the result may be
/// shorter than `k`.
pub async fn search(
    query: &str,
    index: &VectorIndex,
    id_map: &HashMap<String, RecipeRecord>,
    k: usize,
    embedder: &dyn Embedder,
) -> Result<Vec<RecipeRecord>> {
    if k == 0 || index.is_empty() {
        return Ok(Vec::new());
    }

    let query_vector = embedder.embed(query).await?;
    let hits = index.nearest(&query_vector, k)?;

    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        match id_map.get(&hit.id) {
            Some(recipe) => {
                debug!("Match {} ({:.3}): {}", hit.id, hit.score, recipe.title);
                results.push(recipe.clone());
            }
            None => warn!("Index entry {} has no matching recipe", hit.id),
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::get_id_to_recipe;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEmbedder {
        vector: Vec<f32>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.vector.clone())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::Llm("embedding service down".to_string()))
        }
    }

    fn recipe(id: &str, title: &str, embedding: Vec<f32>) -> RecipeRecord {
        RecipeRecord {
            id: id.to_string(),
            title: title.to_string(),
            summary: None,
            ingredients: Vec::new(),
            instructions: None,
            tags: Vec::new(),
            url: None,
            embedding,
        }
    }

    fn corpus() -> (VectorIndex, HashMap<String, RecipeRecord>) {
        let recipes = vec![
            recipe("1", "Chicken Soup", vec![1.0, 0.0]),
            recipe("2", "Green Salad", vec![0.0, 1.0]),
            recipe("3", "Chicken Stew", vec![0.8, 0.2]),
        ];
        let mut index = VectorIndex::new(2);
        for r in &recipes {
            index.add(r.id.clone(), r.embedding.clone()).unwrap();
        }
        (index, get_id_to_recipe(&recipes))
    }

    #[tokio::test]
    async fn test_search_returns_best_matches_first() {
        let (index, id_map) = corpus();
        let embedder = FixedEmbedder {
            vector: vec![1.0, 0.0],
            calls: AtomicUsize::new(0),
        };

        let results = search("chicken", &index, &id_map, 2, &embedder).await.unwrap();

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Chicken Soup", "Chicken Stew"]);
    }

    #[tokio::test]
    async fn test_search_zero_k_skips_embedding() {
        let (index, id_map) = corpus();
        let embedder = FixedEmbedder {
            vector: vec![1.0, 0.0],
            calls: AtomicUsize::new(0),
        };

        let results = search("chicken", &index, &id_map, 0, &embedder).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_skips_unknown_ids() {
        let (mut index, id_map) = corpus();
        index.add("orphan", vec![1.0, 0.0]).unwrap();
        let embedder = FixedEmbedder {
            vector: vec![1.0, 0.0],
            calls: AtomicUsize::new(0),
        };

        let results = search("soup", &index, &id_map, 4, &embedder).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.id != "orphan"));
    }

    #[tokio::test]
    async fn test_search_propagates_embedding_failure() {
        let (index, id_map) = corpus();
        let result = search("soup", &index, &id_map, 3, &FailingEmbedder).await;
        assert!(result.is_err());
    }
}
