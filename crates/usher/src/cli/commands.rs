//! CLI command implementations and engine assembly

use anyhow::{anyhow, Result};
use colored::*;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::UsherConfig;
use crate::error::UsherError;
use crate::server::models::event;
use crate::server::server::start_server;
use crate::server::services::expansion::QueryExpander;
use crate::server::services::index::EventIndex;
use crate::server::services::providers::{ChatProvider, OpenAiProvider};
use crate::server::services::recommender::{RecommendationResponse, Recommender};
use crate::server::services::store::MemoryStore;

/// Recommend events for a free-text interest statement and print them
pub async fn recommend(config: &UsherConfig, preferences: &str, count: Option<usize>) -> Result<()> {
  let recommender = build_recommender(config).await?;
  let count = count.unwrap_or(config.result_count);

  let response = recommender.recommend(preferences, count).await?;
  display_recommendations(&response);
  Ok(())
}

/// Show the expanded query the engine would search with (debugging aid)
pub async fn expand(config: &UsherConfig, input: &str) -> Result<()> {
  let provider = Arc::new(openai_provider(config)?);
  let expander = QueryExpander::new(provider as Arc<dyn ChatProvider>);

  let expanded = expander.expand(input).await;
  println!("{} {input}", "input:".blue().bold());
  println!("{} {expanded}", "expanded:".blue().bold());
  Ok(())
}

/// Start the REST server
pub async fn serve(config: &UsherConfig, port: Option<u16>) -> Result<()> {
  let recommender = Arc::new(build_recommender(config).await?);
  let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.server_port)));
  start_server(addr, recommender).await
}

/// Assemble the full engine: providers, store, index (loaded from the
/// configured event source), expander, and composer
async fn build_recommender(config: &UsherConfig) -> Result<Recommender> {
  let provider = Arc::new(openai_provider(config)?);
  let store = Arc::new(MemoryStore::new(provider.clone()));
  let index = EventIndex::new(store);

  match event::load_from_path(&config.events_path) {
    Ok(events) => {
      let stored = index.load(&events).await?;
      tracing::info!("loaded {stored} events from {}", config.events_path.display());
    }
    Err(UsherError::MalformedSourceData(message)) => {
      // A broken source degrades to an empty index; every query will
      // return the no-match message until the source is fixed
      tracing::error!("could not load events, continuing with an empty index: {message}");
    }
    Err(e) => return Err(e.into()),
  }

  let expander = QueryExpander::new(provider.clone() as Arc<dyn ChatProvider>);
  let recommender = Recommender::new(expander, index, provider as Arc<dyn ChatProvider>)
    .with_default_count(config.result_count);
  Ok(recommender)
}

fn openai_provider(config: &UsherConfig) -> Result<OpenAiProvider> {
  let api_key = std::env::var("OPENAI_API_KEY")
    .map_err(|_| anyhow!("OPENAI_API_KEY is not set; export it before running usher"))?;
  Ok(OpenAiProvider::new(config, api_key))
}

/// Display the recommendations with the summary first
fn display_recommendations(response: &RecommendationResponse) {
  if response.recommendations.is_empty() {
    println!("{}", response.message.yellow());
    return;
  }

  println!("{}", response.message);
  println!();

  for recommendation in &response.recommendations {
    let event = &recommendation.event;
    println!("=== {} ===", event.title.blue().bold());
    println!("  Date: {}", event.date);
    if let Some(event_type) = &event.event_type {
      println!("  Type: {event_type}");
    }
    if let Some(audience) = &event.audience {
      println!("  Audience: {audience}");
    }
    if let Some(url) = &event.url {
      println!("  URL: {}", url.cyan());
    }
    if let Some(score) = recommendation.similarity_score {
      println!("  Distance: {score:.3}");
    }
    println!();
  }
}
