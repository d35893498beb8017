//! External provider boundaries: text embeddings and language-model chat
//!
//! Both providers are trait objects so the engine can be assembled with
//! production OpenAI-backed implementations or with test doubles. The
//! engine itself never constructs a provider.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::UsherConfig;

/// Produces a vector representation of a piece of text
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
  async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Completes a chat exchange given a system instruction and user prompt
#[async_trait]
pub trait ChatProvider: Send + Sync {
  async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String>;
}

/// OpenAI-backed implementation of both provider traits
pub struct OpenAiProvider {
  http: reqwest::Client,
  api_base: String,
  api_key: String,
  embedding_model: String,
  chat_model: String,
}

impl OpenAiProvider {
  pub fn new(config: &UsherConfig, api_key: String) -> Self {
    Self {
      http: reqwest::Client::new(),
      api_base: config.api_base.trim_end_matches('/').to_string(),
      api_key,
      embedding_model: config.embedding_model.clone(),
      chat_model: config.chat_model.clone(),
    }
  }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
  embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
  content: String,
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let request = EmbeddingRequest { model: &self.embedding_model, input: text };

    let response = self
      .http
      .post(format!("{}/embeddings", self.api_base))
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| anyhow!("embedding request failed: {e}"))?
      .error_for_status()
      .map_err(|e| anyhow!("embedding request rejected: {e}"))?
      .json::<EmbeddingResponse>()
      .await
      .map_err(|e| anyhow!("invalid embedding response: {e}"))?;

    response
      .data
      .into_iter()
      .next()
      .map(|data| data.embedding)
      .ok_or_else(|| anyhow!("embedding response contained no vectors"))
  }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
  async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
    let request = ChatRequest {
      model: &self.chat_model,
      messages: vec![
        ChatMessage { role: "system", content: system },
        ChatMessage { role: "user", content: user },
      ],
      temperature,
    };

    let response = self
      .http
      .post(format!("{}/chat/completions", self.api_base))
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| anyhow!("chat request failed: {e}"))?
      .error_for_status()
      .map_err(|e| anyhow!("chat request rejected: {e}"))?
      .json::<ChatResponse>()
      .await
      .map_err(|e| anyhow!("invalid chat response: {e}"))?;

    response
      .choices
      .into_iter()
      .next()
      .map(|choice| choice.message.content)
      .ok_or_else(|| anyhow!("chat response contained no choices"))
  }
}
