//! Error taxonomy for the recommendation engine
//!
//! Provider failures during query expansion are absorbed locally and never
//! reach callers; failures during final response composition and store
//! failures always surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsherError {
  /// The raw event source is missing or unparsable. Callers proceed with an
  /// empty index rather than failing hard.
  #[error("event source is missing or malformed: {0}")]
  MalformedSourceData(String),

  /// The similarity store (or its embedding provider) failed.
  #[error("similarity store operation failed: {0}")]
  Store(String),

  /// The language-model call while composing the final response failed.
  #[error("failed to generate recommendation text: {0}")]
  RecommendationGeneration(String),
}
