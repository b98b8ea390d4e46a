//! Ollama API client for chat and code generation.
//!
//! A thin, stateless client for a remote Ollama server: liveness check
//! via `GET /api/tags`, non-streaming generation via
//! `POST /api/generate`, and the prompt shaping used for chat and code
//! completion. No conversation state is kept here.

mod client;
mod error;
mod types;

pub use client::{Client, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::OllamaError;
pub use types::{ChatMessage, GenerateOptions, GenerateRequest, GenerateResponse, ModelInfo};
