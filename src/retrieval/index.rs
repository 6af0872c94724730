use crate::retrieval::RawId;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

/// Flat (brute-force) vector index over recipe embeddings.
///
/// Stored on disk as JSON: `{"dims": N, "ids": [...], "vectors": [[...], ...]}`,
/// where `ids[i]` names the recipe whose embedding is `vectors[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    pub dims: usize,
    #[serde(deserialize_with = "deserialize_ids")]
    pub ids: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
}

/// A single nearest-neighbour match
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub score: f32,
}

fn deserialize_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawId>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(RawId::into_string).collect())
}

impl VectorIndex {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            ids: Vec::new(),
            vectors: Vec::new(),
        }
    }

    /// Add a vector under the given id
    pub fn add(&mut self, id: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dims {
            return Err(Error::Retrieval(format!(
                "Vector has {} dimensions, index expects {}",
                vector.len(),
                self.dims
            )));
        }
        self.ids.push(id.into());
        self.vectors.push(vector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check that ids and vectors line up and every vector has `dims` entries
    pub fn validate(&self) -> Result<()> {
        if self.dims == 0 {
            return Err(Error::Retrieval("Index dimension must be non-zero".to_string()));
        }

        if self.ids.len() != self.vectors.len() {
            return Err(Error::Retrieval(format!(
                "Index has {} ids but {} vectors",
                self.ids.len(),
                self.vectors.len()
            )));
        }

        if let Some(pos) = self.vectors.iter().position(|v| v.len() != self.dims) {
            return Err(Error::Retrieval(format!(
                "Vector for {} has {} dimensions, index expects {}",
                self.ids[pos],
                self.vectors[pos].len(),
                self.dims
            )));
        }

        Ok(())
    }

    /// The `k` entries most similar to `vector`, best first.
    /// Equal scores keep index order.
    pub fn nearest(&self, vector: &[f32], k: usize) -> Result<Vec<IndexHit>> {
        if vector.len() != self.dims {
            return Err(Error::Retrieval(format!(
                "Query vector has {} dimensions, index expects {}",
                vector.len(),
                self.dims
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(vector, v)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| IndexHit {
                id: self.ids[i].clone(),
                score,
            })
            .collect())
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; `0.0` for empty vectors, zero vectors
/// or vectors of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
