//! REST server startup and configuration

use anyhow::Result;
use axum::serve;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::routing::create_router;
use crate::server::services::recommender::Recommender;

/// Start the REST server with a fully assembled recommender
pub async fn start_server(addr: SocketAddr, recommender: Arc<Recommender>) -> Result<()> {
  tracing::info!("starting usher REST server on {addr}");

  let app = create_router(recommender)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  tracing::info!("server listening on {addr}");

  match serve(listener, app).await {
    Ok(_) => {
      tracing::info!("server shutdown gracefully");
      Ok(())
    }
    Err(e) => {
      tracing::error!("server error: {e}");
      Err(anyhow::anyhow!("server error: {e}"))
    }
  }
}
