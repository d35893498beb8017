//! Raw event records and their scalar metadata representation
//!
//! Events arrive as heterogeneous JSON objects with no fixed schema. The
//! types here keep the original field order (it drives document line order
//! during normalization) and pin down the coercion rules that turn arbitrary
//! field values into the scalar-only metadata the similarity store accepts.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::UsherError;

// Field names the engine gives special treatment
pub const FIELD_SUMMARY: &str = "Event Summary";
pub const FIELD_DATE: &str = "Event Date";
pub const FIELD_TYPE: &str = "Event Type";
pub const FIELD_AUDIENCE: &str = "Target Audience";
pub const FIELD_DEPARTMENT: &str = "Department";
pub const FIELD_TAGS: &str = "Tags";
pub const FIELD_TITLE: &str = "Event Title";
pub const FIELD_URL: &str = "URL";
pub const FIELD_KEYWORDS: &str = "keywords";

/// A single field value as it appears in the raw event source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
  Text(String),
  Number(serde_json::Number),
  Flag(bool),
  List(Vec<serde_json::Value>),
  Other(serde_json::Value),
}

impl FieldValue {
  /// Render the value the way it would appear in user-facing output
  pub fn display_string(&self) -> String {
    match self {
      FieldValue::Text(text) => text.clone(),
      FieldValue::Number(number) => number.to_string(),
      FieldValue::Flag(flag) => flag.to_string(),
      FieldValue::List(items) => join_items(items),
      FieldValue::Other(value) => value.to_string(),
    }
  }
}

/// Stringify a list element: strings pass through, everything else keeps
/// its JSON rendering
pub fn item_text(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::String(text) => text.clone(),
    other => other.to_string(),
  }
}

/// Comma-join the stringified elements of a list field
pub fn join_items(items: &[serde_json::Value]) -> String {
  items.iter().map(item_text).collect::<Vec<_>>().join(", ")
}

/// Scalar metadata value after normalization (the similarity store rejects
/// anything that is not a string, number, or boolean)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
  Text(String),
  Number(serde_json::Number),
  Flag(bool),
}

impl fmt::Display for MetadataValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MetadataValue::Text(text) => f.write_str(text),
      MetadataValue::Number(number) => write!(f, "{number}"),
      MetadataValue::Flag(flag) => write!(f, "{flag}"),
    }
  }
}

/// Flattened, scalar-only metadata attached to an indexed event
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A raw event record: an ordered mapping of field name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
  fields: Vec<(String, FieldValue)>,
}

impl RawEvent {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set a field, replacing any existing value under the same name
  pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
    let key = key.into();
    if let Some(entry) = self.fields.iter_mut().find(|(name, _)| *name == key) {
      entry.1 = value;
    } else {
      self.fields.push((key, value));
    }
  }

  pub fn get(&self, key: &str) -> Option<&FieldValue> {
    self.fields.iter().find(|(name, _)| name == key).map(|(_, value)| value)
  }

  /// Iterate fields in their original source order
  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
    self.fields.iter().map(|(name, value)| (name.as_str(), value))
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Composite key used to collapse duplicate events at load time.
  /// Missing fields contribute an empty string.
  pub fn dedup_key(&self) -> (String, String) {
    let summary = self.get(FIELD_SUMMARY).map(FieldValue::display_string).unwrap_or_default();
    let date = self.get(FIELD_DATE).map(FieldValue::display_string).unwrap_or_default();
    (summary, date)
  }
}

impl Serialize for RawEvent {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut map = serializer.serialize_map(Some(self.fields.len()))?;
    for (key, value) in &self.fields {
      map.serialize_entry(key, value)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for RawEvent {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct RawEventVisitor;

    impl<'de> Visitor<'de> for RawEventVisitor {
      type Value = RawEvent;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of event fields")
      }

      fn visit_map<A>(self, mut access: A) -> Result<RawEvent, A::Error>
      where
        A: MapAccess<'de>,
      {
        let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
          fields.push((key, value));
        }
        Ok(RawEvent { fields })
      }
    }

    deserializer.deserialize_map(RawEventVisitor)
  }
}

/// Load a batch of raw events from a JSON file
pub fn load_from_path(path: &Path) -> Result<Vec<RawEvent>, UsherError> {
  let content = std::fs::read_to_string(path)
    .map_err(|e| UsherError::MalformedSourceData(format!("{}: {e}", path.display())))?;
  serde_json::from_str(&content)
    .map_err(|e| UsherError::MalformedSourceData(format!("{}: {e}", path.display())))
}
