//! Query expansion: taxonomy triggering plus language-model keywords
//!
//! A free-text interest statement becomes an OR-joined query string: the
//! lowercased input, any taxonomy terms it triggers, and model-suggested
//! related keywords. A failed model call degrades to taxonomy-only expansion
//! with a warning; it never fails the request.

use std::sync::Arc;

use crate::server::services::providers::ChatProvider;

const KEYWORD_INSTRUCTION: &str = "Generate 5-7 related keywords for the user's stated interests. \
   Respond with only a comma-separated list of keywords and no other text.";
const KEYWORD_TEMPERATURE: f32 = 0.7;

pub struct QueryExpander {
  taxonomy: Vec<(String, Vec<String>)>,
  chat: Arc<dyn ChatProvider>,
}

impl QueryExpander {
  pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
    Self::with_taxonomy(chat, default_taxonomy())
  }

  /// Construct with an alternate taxonomy (ordered list of
  /// (major, related terms) pairs)
  pub fn with_taxonomy(chat: Arc<dyn ChatProvider>, taxonomy: Vec<(String, Vec<String>)>) -> Self {
    Self { taxonomy, chat }
  }

  /// Expand a user interest statement into an OR-joined query string
  pub async fn expand(&self, input: &str) -> String {
    let mut terms = self.taxonomy_terms(input);

    match self.related_keywords(input).await {
      Ok(related) => {
        for term in related {
          push_unique(&mut terms, term);
        }
      }
      Err(e) => {
        tracing::warn!("keyword expansion unavailable, using taxonomy terms only: {e}");
      }
    }

    terms.join(" OR ")
  }

  /// The deterministic part of the expansion: the lowercased input followed
  /// by every taxonomy entry it triggers.
  ///
  /// Triggering uses substring containment on both the major name and its
  /// related terms, so short terms can match inside unrelated words
  /// ("art" inside "smart"). That looseness is intentional and pinned by
  /// tests; tighten only together with them.
  pub fn taxonomy_terms(&self, input: &str) -> Vec<String> {
    let normalized = input.trim().to_lowercase();
    let mut terms = vec![normalized.clone()];

    for (major, related) in &self.taxonomy {
      let triggered = normalized.contains(major.as_str())
        || related.iter().any(|term| normalized.contains(term.as_str()));

      if triggered {
        push_unique(&mut terms, major.clone());
        for term in related {
          push_unique(&mut terms, term.clone());
        }
      }
    }

    terms
  }

  async fn related_keywords(&self, input: &str) -> anyhow::Result<Vec<String>> {
    let response = self.chat.complete(KEYWORD_INSTRUCTION, input, KEYWORD_TEMPERATURE).await?;

    let keywords: Vec<String> = response
      .split(',')
      .map(|keyword| keyword.trim().to_lowercase())
      .filter(|keyword| !keyword.is_empty())
      .collect();

    if keywords.is_empty() {
      anyhow::bail!("keyword response contained no usable terms: {response:?}");
    }
    Ok(keywords)
  }
}

fn push_unique(terms: &mut Vec<String>, term: String) {
  if !terms.contains(&term) {
    terms.push(term);
  }
}

/// Built-in mapping from academic/professional major to related interest
/// terms, in declaration order
pub fn default_taxonomy() -> Vec<(String, Vec<String>)> {
  fn entry(major: &str, related: &[&str]) -> (String, Vec<String>) {
    (major.to_string(), related.iter().map(|term| term.to_string()).collect())
  }

  vec![
    entry("computer science", &["technology", "engineering", "programming", "software", "it"]),
    entry("business", &["entrepreneurship", "finance", "marketing", "networking", "management"]),
    entry("nursing", &["health", "healthcare", "medical", "wellness", "clinical"]),
    entry("art", &["design", "creative", "music", "theater", "exhibition"]),
    entry("education", &["teaching", "learning", "workshop", "tutoring"]),
    entry("psychology", &["counseling", "mental health", "wellness", "research"]),
    entry("criminal justice", &["law", "legal", "public safety", "forensics"]),
    entry("culinary", &["cooking", "food", "hospitality", "baking"]),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::Result;
  use async_trait::async_trait;

  struct ScriptedChat(String);

  #[async_trait]
  impl ChatProvider for ScriptedChat {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> Result<String> {
      Ok(self.0.clone())
    }
  }

  struct FailingChat;

  #[async_trait]
  impl ChatProvider for FailingChat {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> Result<String> {
      anyhow::bail!("model offline")
    }
  }

  fn expander(chat: impl ChatProvider + 'static) -> QueryExpander {
    QueryExpander::new(Arc::new(chat))
  }

  #[test]
  fn test_taxonomy_triggers_on_major_name() {
    let expander = expander(FailingChat);
    let terms = expander.taxonomy_terms("Computer Science");

    assert_eq!(terms[0], "computer science");
    for expected in ["technology", "engineering", "programming", "software", "it"] {
      assert!(terms.contains(&expected.to_string()), "missing {expected}");
    }
  }

  #[test]
  fn test_taxonomy_triggers_on_related_term() {
    let expander = expander(FailingChat);
    let terms = expander.taxonomy_terms("anything about programming");

    assert!(terms.contains(&"computer science".to_string()));
    assert!(terms.contains(&"software".to_string()));
  }

  #[test]
  fn test_unmatched_input_keeps_only_itself() {
    let expander = QueryExpander::with_taxonomy(
      Arc::new(FailingChat),
      vec![("botany".to_string(), vec!["plants".to_string()])],
    );
    let terms = expander.taxonomy_terms("quantum computing");

    assert_eq!(terms, vec!["quantum computing".to_string()]);
  }

  #[test]
  fn test_substring_matching_is_loose_by_design() {
    let expander = expander(FailingChat);
    // "art" matches inside "smart", triggering the art entry
    let terms = expander.taxonomy_terms("smart city planning");

    assert!(terms.contains(&"art".to_string()));
    assert!(terms.contains(&"design".to_string()));
  }

  #[tokio::test]
  async fn test_model_keywords_are_appended() {
    let expander = expander(ScriptedChat("Robotics, AI , machine learning".to_string()));
    let expanded = expander.expand("computer science").await;

    assert!(expanded.contains("robotics"));
    assert!(expanded.contains("ai"));
    assert!(expanded.contains("machine learning"));
    assert!(expanded.contains(" OR "));
  }

  #[tokio::test]
  async fn test_taxonomy_terms_survive_model_augmentation() {
    let expander = expander(ScriptedChat("robotics, drones".to_string()));
    let taxonomy_terms = expander.taxonomy_terms("computer science");
    let expanded = expander.expand("computer science").await;

    for term in taxonomy_terms {
      assert!(expanded.contains(&term), "taxonomy term {term} dropped");
    }
  }

  #[tokio::test]
  async fn test_provider_failure_falls_back_to_taxonomy() {
    let expander = expander(FailingChat);
    let expanded = expander.expand("computer science").await;

    assert_eq!(expanded, expander.taxonomy_terms("computer science").join(" OR "));
  }

  #[tokio::test]
  async fn test_blank_model_response_falls_back() {
    let expander = expander(ScriptedChat(" , ,, ".to_string()));
    let expanded = expander.expand("culinary arts").await;

    assert_eq!(expanded, expander.taxonomy_terms("culinary arts").join(" OR "));
  }

  #[tokio::test]
  async fn test_expansion_starts_with_lowercased_input() {
    let expander = expander(ScriptedChat("extra".to_string()));
    let expanded = expander.expand("  Veteran Events  ").await;

    assert!(expanded.starts_with("veteran events"));
  }
}
