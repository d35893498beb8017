//! Keyword extraction from descriptive event fields
//!
//! Produces the lowercase token set stored in the `keywords` metadata field.
//! A `BTreeSet` keeps the joined output deterministic for identical input.

use std::collections::BTreeSet;

use crate::server::models::event::{
  item_text, FieldValue, RawEvent, FIELD_AUDIENCE, FIELD_DEPARTMENT, FIELD_SUMMARY, FIELD_TAGS,
  FIELD_TYPE,
};

/// Fields that contribute keywords
pub const KEYWORD_FIELDS: [&str; 5] =
  [FIELD_SUMMARY, FIELD_TYPE, FIELD_AUDIENCE, FIELD_DEPARTMENT, FIELD_TAGS];

/// Extract the lowercase keyword set from an event's descriptive fields.
/// String fields are tokenized on alphanumeric runs; list fields tokenize
/// each stringified element. Missing fields contribute nothing.
pub fn extract_keywords(event: &RawEvent) -> BTreeSet<String> {
  let mut keywords = BTreeSet::new();

  for field in KEYWORD_FIELDS {
    match event.get(field) {
      Some(FieldValue::Text(text)) => tokenize_into(text, &mut keywords),
      Some(FieldValue::List(items)) => {
        for item in items {
          tokenize_into(&item_text(item), &mut keywords);
        }
      }
      _ => {}
    }
  }

  keywords
}

/// Join a keyword set into the comma-separated form stored in metadata
pub fn join_keywords(keywords: &BTreeSet<String>) -> String {
  keywords.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn tokenize_into(text: &str, out: &mut BTreeSet<String>) {
  for token in text.split(|c: char| !c.is_alphanumeric()) {
    if !token.is_empty() {
      out.insert(token.to_lowercase());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn event(json: &str) -> RawEvent {
    serde_json::from_str(json).unwrap()
  }

  #[test]
  fn test_keywords_are_lowercased_tokens() {
    let event = event(r#"{"Event Type": "Career Fair"}"#);
    let keywords = extract_keywords(&event);

    assert!(keywords.contains("career"));
    assert!(keywords.contains("fair"));
  }

  #[test]
  fn test_casing_does_not_matter() {
    let upper = event(r#"{"Event Type": "CAREER FAIR"}"#);
    let lower = event(r#"{"Event Type": "career fair"}"#);

    assert_eq!(extract_keywords(&upper), extract_keywords(&lower));
  }

  #[test]
  fn test_list_fields_tokenize_each_element() {
    let event = event(r#"{"Tags": ["STEM Outreach", "veteran-friendly"]}"#);
    let keywords = extract_keywords(&event);

    assert!(keywords.contains("stem"));
    assert!(keywords.contains("outreach"));
    assert!(keywords.contains("veteran"));
    assert!(keywords.contains("friendly"));
  }

  #[test]
  fn test_fields_outside_allowlist_ignored() {
    let event = event(r#"{"URL": "http://example.edu/fair", "Event Summary": "Art Walk"}"#);
    let keywords = extract_keywords(&event);

    assert!(keywords.contains("art"));
    assert!(keywords.contains("walk"));
    assert!(!keywords.contains("http"));
    assert!(!keywords.contains("example"));
  }

  #[test]
  fn test_missing_fields_contribute_nothing() {
    let keywords = extract_keywords(&RawEvent::new());
    assert!(keywords.is_empty());
  }

  #[test]
  fn test_join_is_deterministic() {
    let event = event(r#"{"Event Summary": "Robotics Demo Night", "Tags": ["stem"]}"#);

    let first = join_keywords(&extract_keywords(&event));
    let second = join_keywords(&extract_keywords(&event));
    assert_eq!(first, second);
    assert_eq!(first, "demo, night, robotics, stem");
  }
}
