//! Similarity store abstraction and the in-memory implementation
//!
//! The engine depends on exactly two store operations: a bulk insert of
//! (id, document, metadata) triples and a nearest-neighbor query by text.
//! `MemoryStore` embeds documents through an injected provider and ranks by
//! cosine distance; other backends can be swapped in behind the trait.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::server::models::event::Metadata;
use crate::server::services::providers::EmbeddingProvider;

/// A single nearest-neighbor hit
#[derive(Debug, Clone)]
pub struct ScoredHit {
  /// Identifier assigned at load time
  pub id: String,
  /// Stored metadata for the matched document
  pub metadata: Metadata,
  /// Store-defined distance; lower is closer. Callers must not assume any
  /// particular tie-break order.
  pub distance: f32,
}

/// Vector similarity store interface
#[async_trait]
pub trait SimilarityStore: Send + Sync {
  /// Bulk-insert documents with their ids and metadata
  async fn add_batch(
    &self,
    ids: Vec<String>,
    documents: Vec<String>,
    metadatas: Vec<Metadata>,
  ) -> Result<()>;

  /// Return up to `k` nearest stored documents for the query text.
  /// An empty store yields an empty hit list.
  async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredHit>>;
}

struct StoredRow {
  id: String,
  metadata: Metadata,
  embedding: Vec<f32>,
}

/// In-memory cosine-distance store, rebuilt wholesale each process lifetime
pub struct MemoryStore {
  embedder: Arc<dyn EmbeddingProvider>,
  rows: RwLock<Vec<StoredRow>>,
}

impl MemoryStore {
  pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
    Self { embedder, rows: RwLock::new(Vec::new()) }
  }
}

#[async_trait]
impl SimilarityStore for MemoryStore {
  async fn add_batch(
    &self,
    ids: Vec<String>,
    documents: Vec<String>,
    metadatas: Vec<Metadata>,
  ) -> Result<()> {
    if ids.len() != documents.len() || ids.len() != metadatas.len() {
      bail!(
        "mismatched batch lengths: {} ids, {} documents, {} metadatas",
        ids.len(),
        documents.len(),
        metadatas.len()
      );
    }
    if ids.is_empty() {
      bail!("cannot insert an empty batch");
    }

    let mut batch = Vec::with_capacity(ids.len());
    for ((id, document), metadata) in ids.into_iter().zip(documents).zip(metadatas) {
      let embedding = self.embedder.embed(&document).await?;
      batch.push(StoredRow { id, metadata, embedding });
    }

    let stored = batch.len();
    self.rows.write().await.extend(batch);
    tracing::debug!("stored {stored} documents in memory store");
    Ok(())
  }

  async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredHit>> {
    let query_embedding = self.embedder.embed(text).await?;
    let rows = self.rows.read().await;

    let mut hits: Vec<ScoredHit> = rows
      .iter()
      .map(|row| ScoredHit {
        id: row.id.clone(),
        metadata: row.metadata.clone(),
        distance: 1.0 - cosine_similarity(&query_embedding, &row.embedding),
      })
      .collect();

    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(k);
    Ok(hits)
  }
}

/// Cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
  if a.len() != b.len() {
    return 0.0;
  }

  let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
  let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
  let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

  if magnitude_a == 0.0 || magnitude_b == 0.0 {
    0.0
  } else {
    dot_product / (magnitude_a * magnitude_b)
  }
}
