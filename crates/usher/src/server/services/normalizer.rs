//! Event normalization: canonical document text plus flattened metadata
//!
//! The document is what gets embedded; the metadata is what comes back with
//! query hits. Both are derived from the raw event in a single pass so the
//! two views can never drift apart.

use crate::server::models::event::{join_items, FieldValue, Metadata, MetadataValue, RawEvent};

/// Convert a raw event into its embedding document and scalar metadata.
///
/// Document lines follow the raw event's field order and cover non-empty
/// string and list fields as `"key: value"`. Metadata retains every field:
/// lists are comma-joined, strings/numbers/booleans pass through, anything
/// else is coerced to its string form. Pure function; identical input yields
/// identical output.
pub fn normalize(event: &RawEvent) -> (String, Metadata) {
  let mut lines = Vec::new();
  let mut metadata = Metadata::new();

  for (key, value) in event.iter() {
    match value {
      FieldValue::Text(text) => {
        if !text.trim().is_empty() {
          lines.push(format!("{key}: {text}"));
        }
        metadata.insert(key.to_string(), MetadataValue::Text(text.clone()));
      }
      FieldValue::List(items) => {
        let joined = join_items(items);
        if !items.is_empty() {
          lines.push(format!("{key}: {joined}"));
        }
        metadata.insert(key.to_string(), MetadataValue::Text(joined));
      }
      FieldValue::Number(number) => {
        metadata.insert(key.to_string(), MetadataValue::Number(number.clone()));
      }
      FieldValue::Flag(flag) => {
        metadata.insert(key.to_string(), MetadataValue::Flag(*flag));
      }
      FieldValue::Other(other) => {
        metadata.insert(key.to_string(), MetadataValue::Text(other.to_string()));
      }
    }
  }

  (lines.join("\n"), metadata)
}
