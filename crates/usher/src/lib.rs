//! Usher - Event Recommendation Engine
//!
//! Recommends events from a natural-language description of interests using
//! vector similarity search over an event corpus, with a language model for
//! query expansion and response phrasing.

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
