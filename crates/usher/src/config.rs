//! Configuration management for Usher
//!
//! Loads engine and server settings from a JSON file, with sensible
//! defaults when no file is present. The OpenAI API key is deliberately
//! kept out of the file and read from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsherConfig {
  /// Path to the JSON file holding the raw event batch
  #[serde(default = "default_events_path")]
  pub events_path: PathBuf,
  /// Base URL of the OpenAI-compatible API
  #[serde(default = "default_api_base")]
  pub api_base: String,
  /// Model used for document and query embeddings
  #[serde(default = "default_embedding_model")]
  pub embedding_model: String,
  /// Model used for query expansion and response phrasing
  #[serde(default = "default_chat_model")]
  pub chat_model: String,
  /// How many recommendations a request returns by default
  #[serde(default = "default_result_count")]
  pub result_count: usize,
  /// Port for the REST server
  #[serde(default = "default_server_port")]
  pub server_port: u16,
}

fn default_events_path() -> PathBuf {
  PathBuf::from("events.json")
}
fn default_api_base() -> String {
  "https://api.openai.com/v1".to_string()
}
fn default_embedding_model() -> String {
  "text-embedding-3-small".to_string()
}
fn default_chat_model() -> String {
  "gpt-4-turbo-preview".to_string()
}
fn default_result_count() -> usize {
  3
}
fn default_server_port() -> u16 {
  8000
}

impl Default for UsherConfig {
  fn default() -> Self {
    Self {
      events_path: default_events_path(),
      api_base: default_api_base(),
      embedding_model: default_embedding_model(),
      chat_model: default_chat_model(),
      result_count: default_result_count(),
      server_port: default_server_port(),
    }
  }
}

impl UsherConfig {
  /// Load configuration from a specific file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let config: UsherConfig = serde_json::from_str(&content)?;
    Ok(config)
  }

  /// Load configuration from the current directory or fall back to defaults
  pub fn load() -> anyhow::Result<Self> {
    let config_paths = [".usher.json", "usher.json"];

    for path in &config_paths {
      if Path::new(path).exists() {
        return Self::load_from_file(path);
      }
    }

    Ok(UsherConfig::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_defaults() {
    let config = UsherConfig::default();
    assert_eq!(config.events_path, PathBuf::from("events.json"));
    assert_eq!(config.embedding_model, "text-embedding-3-small");
    assert_eq!(config.result_count, 3);
    assert_eq!(config.server_port, 8000);
  }

  #[test]
  fn test_load_partial_config_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("usher.json");
    fs::write(&config_path, r#"{"result_count": 5, "server_port": 9100}"#).unwrap();

    let config = UsherConfig::load_from_file(&config_path).unwrap();
    assert_eq!(config.result_count, 5);
    assert_eq!(config.server_port, 9100);
    assert_eq!(config.chat_model, "gpt-4-turbo-preview");
  }

  #[test]
  fn test_load_invalid_json_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.json");
    fs::write(&config_path, "{ nope").unwrap();

    assert!(UsherConfig::load_from_file(&config_path).is_err());
  }

  #[test]
  fn test_load_nonexistent_file_fails() {
    assert!(UsherConfig::load_from_file("missing_config.json").is_err());
  }
}
