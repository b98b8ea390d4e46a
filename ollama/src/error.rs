use thiserror::Error;

/// Error type for Ollama API operations.
#[derive(Error, Debug)]
pub enum OllamaError {
    /// Non-success response from the Ollama server.
    #[error("ollama: api error (status={status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP request error.
    #[error("ollama: http error: {0}")]
    Http(#[from] reqwest::Error),
}
