//! Recommendations endpoint handler

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::Json as ResponseJson;
use std::sync::Arc;
use uuid::Uuid;

use crate::server::services::recommender::Recommender;
use crate::server::types::{ApiError, BaseResponse, RecommendationData, RecommendationRequest};

/// POST /recommendations - Recommend events for a free-text interest
/// statement
pub async fn get_recommendations(
  State(recommender): State<Arc<Recommender>>,
  Json(request): Json<RecommendationRequest>,
) -> Result<
  ResponseJson<BaseResponse<RecommendationData>>,
  (StatusCode, ResponseJson<BaseResponse<()>>),
> {
  let transaction_id = Uuid::new_v4();

  if request.preferences.trim().is_empty() {
    let error = ApiError::new("missing_preferences", "No preferences provided");
    return Err((
      StatusCode::BAD_REQUEST,
      ResponseJson(BaseResponse::<()>::error(vec![error], transaction_id)),
    ));
  }

  let count = request.count.unwrap_or_else(|| recommender.default_count());

  match recommender.recommend(&request.preferences, count).await {
    Ok(response) => {
      tracing::info!(
        "returning {} recommendations for transaction {transaction_id}",
        response.recommendations.len()
      );
      Ok(ResponseJson(BaseResponse::success(
        RecommendationData { message: response.message, events: response.recommendations },
        transaction_id,
      )))
    }
    Err(e) => {
      tracing::error!("recommendation request failed: {e}");
      let error = ApiError::new("recommendation_failed", &format!("{e}"));
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        ResponseJson(BaseResponse::<()>::error(vec![error], transaction_id)),
      ))
    }
  }
}
