//! The event index: deduplicated bulk load and nearest-neighbor query
//!
//! One `load` per process lifetime; the index is read-only once queries
//! begin, so concurrent reads need no locking discipline beyond the store's.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::UsherError;
use crate::server::models::event::{MetadataValue, RawEvent, FIELD_KEYWORDS};
use crate::server::services::keywords::{extract_keywords, join_keywords};
use crate::server::services::normalizer::normalize;
use crate::server::services::store::{ScoredHit, SimilarityStore};

pub struct EventIndex {
  store: Arc<dyn SimilarityStore>,
}

impl EventIndex {
  pub fn new(store: Arc<dyn SimilarityStore>) -> Self {
    Self { store }
  }

  /// Load a batch of raw events, collapsing duplicates on
  /// (Event Summary, Event Date) with the first occurrence winning. Ids are
  /// `event_<i>` where `i` indexes the original input sequence, so skipped
  /// duplicates leave gaps. Returns the number of events stored.
  pub async fn load(&self, events: &[RawEvent]) -> Result<usize, UsherError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let mut documents = Vec::new();
    let mut metadatas = Vec::new();

    for (position, event) in events.iter().enumerate() {
      if !seen.insert(event.dedup_key()) {
        tracing::debug!("skipping duplicate event at position {position}");
        continue;
      }

      let (document, mut metadata) = normalize(event);
      let keywords = extract_keywords(event);
      metadata.insert(FIELD_KEYWORDS.to_string(), MetadataValue::Text(join_keywords(&keywords)));

      ids.push(format!("event_{position}"));
      documents.push(document);
      metadatas.push(metadata);
    }

    // The store may reject empty batches; skip the call entirely
    if ids.is_empty() {
      return Ok(0);
    }

    let stored = ids.len();
    self
      .store
      .add_batch(ids, documents, metadatas)
      .await
      .map_err(|e| UsherError::Store(e.to_string()))?;

    tracing::info!("indexed {stored} of {} events", events.len());
    Ok(stored)
  }

  /// Return up to `k` nearest indexed events for the query text
  pub async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredHit>, UsherError> {
    self.store.query(text, k).await.map_err(|e| UsherError::Store(e.to_string()))
  }
}
