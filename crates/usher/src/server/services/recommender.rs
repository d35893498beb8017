//! Recommendation composition: expand, query, dedupe, phrase
//!
//! The composer orchestrates the full query-time pipeline and returns both
//! a structured result list (authoritative) and a model-phrased summary
//! (presentation only). Zero hits short-circuit to a fixed message without
//! spending a model call.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::UsherError;
use crate::server::models::event::{
  Metadata, FIELD_AUDIENCE, FIELD_DATE, FIELD_SUMMARY, FIELD_TITLE, FIELD_TYPE, FIELD_URL,
};
use crate::server::services::expansion::QueryExpander;
use crate::server::services::index::EventIndex;
use crate::server::services::providers::ChatProvider;

const COMPOSER_INSTRUCTION: &str = "You are an event recommendation assistant. Based on the \
   user's preferences and the available events, suggest the most relevant events. Only give the \
   name of each event and its date.";
const COMPOSER_TEMPERATURE: f32 = 0.7;
const NO_MATCH_MESSAGE: &str =
  "Sorry, I couldn't find any events matching your interests. Try describing them a little \
   differently.";

const DEFAULT_RESULT_COUNT: usize = 3;

/// Display-ready view of a matched event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedEvent {
  pub title: String,
  pub date: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub event_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub audience: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
}

impl RecommendedEvent {
  /// Derive the display view from hit metadata, preferring Event Title and
  /// falling back to the first line of Event Summary
  pub fn from_metadata(metadata: &Metadata) -> Self {
    let summary = field_text(metadata, FIELD_SUMMARY);
    let title = field_text(metadata, FIELD_TITLE)
      .or_else(|| {
        summary
          .as_deref()
          .and_then(|text| text.lines().next())
          .map(|line| line.trim().to_string())
          .filter(|line| !line.is_empty())
      })
      .unwrap_or_else(|| "Untitled Event".to_string());
    let date = field_text(metadata, FIELD_DATE).unwrap_or_else(|| "Date not specified".to_string());

    Self {
      title,
      date,
      url: field_text(metadata, FIELD_URL),
      event_type: field_text(metadata, FIELD_TYPE),
      audience: field_text(metadata, FIELD_AUDIENCE),
      summary,
    }
  }
}

/// One recommendation with its optional store-reported score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
  pub event: RecommendedEvent,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub similarity_score: Option<f32>,
}

/// The full result of a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
  pub recommendations: Vec<Recommendation>,
  pub message: String,
}

pub struct Recommender {
  expander: QueryExpander,
  index: EventIndex,
  chat: Arc<dyn ChatProvider>,
  default_count: usize,
}

impl Recommender {
  pub fn new(expander: QueryExpander, index: EventIndex, chat: Arc<dyn ChatProvider>) -> Self {
    Self { expander, index, chat, default_count: DEFAULT_RESULT_COUNT }
  }

  pub fn with_default_count(mut self, count: usize) -> Self {
    self.default_count = count.max(1);
    self
  }

  pub fn default_count(&self) -> usize {
    self.default_count
  }

  /// Produce up to `count` deduplicated recommendations plus a
  /// natural-language summary
  pub async fn recommend(
    &self,
    preferences: &str,
    count: usize,
  ) -> Result<RecommendationResponse, UsherError> {
    let count = count.max(1);
    let expanded = self.expander.expand(preferences).await;
    tracing::debug!("expanded query: {expanded}");

    // Fan out wider than requested so query-side dedup can't starve the
    // result list
    let fan_out = count.saturating_mul(3).max(count + 2);
    let hits = self.index.query(&expanded, fan_out).await?;

    let mut seen = HashSet::new();
    let mut recommendations = Vec::new();
    for hit in hits {
      let event = RecommendedEvent::from_metadata(&hit.metadata);
      if !seen.insert((event.title.clone(), event.date.clone())) {
        continue;
      }
      recommendations.push(Recommendation { event, similarity_score: Some(hit.distance) });
      if recommendations.len() == count {
        break;
      }
    }

    if recommendations.is_empty() {
      return Ok(RecommendationResponse {
        recommendations,
        message: NO_MATCH_MESSAGE.to_string(),
      });
    }

    let context = build_context(preferences, &recommendations);
    let message = self
      .chat
      .complete(COMPOSER_INSTRUCTION, &context, COMPOSER_TEMPERATURE)
      .await
      .map_err(|e| UsherError::RecommendationGeneration(e.to_string()))?;

    Ok(RecommendationResponse { recommendations, message })
  }
}

fn field_text(metadata: &Metadata, key: &str) -> Option<String> {
  metadata.get(key).map(|value| value.to_string()).filter(|text| !text.trim().is_empty())
}

/// Enumerate the selected events as context for the phrasing model
fn build_context(preferences: &str, recommendations: &[Recommendation]) -> String {
  let mut context = format!("User preferences: {preferences}\n\nAvailable events:\n");

  for recommendation in recommendations {
    let event = &recommendation.event;
    context.push_str(&format!("\n- {}", event.summary.as_deref().unwrap_or(&event.title)));
    context.push_str(&format!("\n  Date: {}", event.date));
    if let Some(event_type) = &event.event_type {
      context.push_str(&format!("\n  Type: {event_type}"));
    }
    if let Some(audience) = &event.audience {
      context.push_str(&format!("\n  Target Audience: {audience}"));
    }
    if let Some(url) = &event.url {
      context.push_str(&format!("\n  URL: {url}"));
    }
  }

  context
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::server::models::event::MetadataValue;

  fn meta(pairs: &[(&str, &str)]) -> Metadata {
    pairs
      .iter()
      .map(|(key, value)| (key.to_string(), MetadataValue::Text(value.to_string())))
      .collect()
  }

  #[test]
  fn test_title_prefers_event_title() {
    let event = RecommendedEvent::from_metadata(&meta(&[
      (FIELD_TITLE, "Spring Career Expo"),
      (FIELD_SUMMARY, "Career Expo\nMeet employers on campus"),
      (FIELD_DATE, "2024-03-15"),
    ]));

    assert_eq!(event.title, "Spring Career Expo");
    assert_eq!(event.date, "2024-03-15");
  }

  #[test]
  fn test_title_falls_back_to_first_summary_line() {
    let event = RecommendedEvent::from_metadata(&meta(&[(
      FIELD_SUMMARY,
      "Veteran Resource Fair\nBenefits counselors on site",
    )]));

    assert_eq!(event.title, "Veteran Resource Fair");
    assert_eq!(event.date, "Date not specified");
  }

  #[test]
  fn test_untitled_event_when_nothing_usable() {
    let event = RecommendedEvent::from_metadata(&meta(&[(FIELD_URL, "http://x")]));
    assert_eq!(event.title, "Untitled Event");
    assert_eq!(event.url, Some("http://x".to_string()));
  }

  #[test]
  fn test_context_block_enumerates_known_fields() {
    let recommendations = vec![Recommendation {
      event: RecommendedEvent {
        title: "Job Fair".to_string(),
        date: "2024-11-01".to_string(),
        url: Some("http://fair".to_string()),
        event_type: Some("Career Fair".to_string()),
        audience: Some("Students".to_string()),
        summary: Some("Job Fair".to_string()),
      },
      similarity_score: Some(0.1),
    }];

    let context = build_context("jobs", &recommendations);
    assert!(context.starts_with("User preferences: jobs"));
    assert!(context.contains("- Job Fair"));
    assert!(context.contains("Date: 2024-11-01"));
    assert!(context.contains("Type: Career Fair"));
    assert!(context.contains("Target Audience: Students"));
    assert!(context.contains("URL: http://fair"));
  }
}
