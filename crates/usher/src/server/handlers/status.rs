//! Status and version endpoint handlers

use axum::response::Json as ResponseJson;
use uuid::Uuid;

use crate::server::types::{BaseResponse, StatusResponse, VersionResponse};

/// GET /status - Service health check
pub async fn status() -> ResponseJson<BaseResponse<StatusResponse>> {
  let transaction_id = Uuid::new_v4();
  ResponseJson(BaseResponse::success(StatusResponse { status: "ok".to_string() }, transaction_id))
}

/// GET /version - API version
pub async fn version() -> ResponseJson<BaseResponse<VersionResponse>> {
  let transaction_id = Uuid::new_v4();
  ResponseJson(BaseResponse::success(
    VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() },
    transaction_id,
  ))
}
