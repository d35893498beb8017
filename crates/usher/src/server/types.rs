//! REST API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::services::recommender::Recommendation;

// Base Response Structure
// ======================

/// Base response object for all API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
  /// The latest version of the API
  pub latest: String,

  /// The version of the API requested by the client
  pub requested: String,

  /// The version of the API that was used in producing the response
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,
}

// Status/Version Endpoints
// =======================

/// Response for /status endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  /// Service health indicator
  pub status: String,
}

/// Response for /version endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
  /// Current API version
  pub version: String,
}

// Recommendations Endpoint
// ========================

/// Request for /recommendations endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationRequest {
  /// Free-text description of the user's interests
  pub preferences: String,

  /// How many recommendations to return (server default when omitted)
  pub count: Option<usize>,
}

/// Response data for /recommendations endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationData {
  /// Natural-language summary of the recommendations
  pub message: String,

  /// Structured, deduplicated results (authoritative)
  pub events: Vec<Recommendation>,
}

// Helper Functions
// ================

impl<T> BaseResponse<T> {
  /// Create a successful response
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    let version = env!("CARGO_PKG_VERSION");
    Self {
      versioning: VersionInfo {
        latest: version.to_string(),
        requested: version.to_string(),
        resolved: version.to_string(),
      },
      transaction_id,
      errors: Vec::new(),
      data,
    }
  }

  /// Create an error response
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    let version = env!("CARGO_PKG_VERSION");
    BaseResponse {
      versioning: VersionInfo {
        latest: version.to_string(),
        requested: version.to_string(),
        resolved: version.to_string(),
      },
      transaction_id,
      errors,
      data: (),
    }
  }
}

impl ApiError {
  /// Create a new API error
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}
