//! Chat and code generation endpoints, proxied to Ollama.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::json;

use facegate_ollama::ChatMessage;

use crate::server::{ApiError, AppState};

/// Languages accepted by the code endpoints (matching the frontend).
pub const SUPPORTED_LANGUAGES: [&str; 14] = [
    "python",
    "javascript",
    "java",
    "cpp",
    "html",
    "css",
    "go",
    "rust",
    "php",
    "ruby",
    "swift",
    "kotlin",
    "typescript",
    "csharp",
];

#[derive(Debug, Deserialize)]
pub struct ChatGenerationRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_chat_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_chat_temperature")]
    pub temperature: f32,
}

fn default_chat_max_tokens() -> u32 {
    500
}

fn default_chat_temperature() -> f32 {
    0.7
}

#[derive(Debug, Deserialize)]
pub struct CodeGenerationRequest {
    pub prompt: String,
    pub language: String,
    #[serde(default = "default_code_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_code_temperature")]
    pub temperature: f32,
}

fn default_code_max_tokens() -> u32 {
    512
}

fn default_code_temperature() -> f32 {
    0.3
}

#[derive(Debug, Deserialize)]
pub struct CodeTranslationRequest {
    pub source_code: String,
    pub source_language: String,
    pub target_language: String,
}

pub async fn chat_generate(
    State(state): State<AppState>,
    Json(request): Json<ChatGenerationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    ensure_ollama(&state).await?;

    if request.messages.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Messages are required"));
    }

    let result = state
        .ollama
        .chat_completion(&request.messages, request.max_tokens, request.temperature)
        .await
        .map_err(|err| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Chat generation failed: {err}"),
            )
        })?;

    tracing::info!("chat response generated successfully");
    Ok(Json(json!({
        "response": result.response,
        "tokens_generated": tokens_generated(&result.response),
        "model": state.ollama.model(),
    })))
}

pub async fn code_generate(
    State(state): State<AppState>,
    Json(request): Json<CodeGenerationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    ensure_ollama(&state).await?;
    validate_language(&request.language)?;

    if request.prompt.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Prompt is required"));
    }

    let result = state
        .ollama
        .code_completion(
            &request.prompt,
            &request.language,
            request.max_tokens,
            request.temperature,
        )
        .await
        .map_err(|err| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Code generation failed: {err}"),
            )
        })?;

    tracing::info!("code generated successfully for language: {}", request.language);
    Ok(Json(json!({
        "response": result.response,
        "language": request.language,
        "tokens_generated": tokens_generated(&result.response),
        "model": state.ollama.model(),
    })))
}

pub async fn code_translate(
    State(state): State<AppState>,
    Json(request): Json<CodeTranslationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    ensure_ollama(&state).await?;
    validate_language(&request.source_language)?;
    validate_language(&request.target_language)?;

    if request.source_code.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Source code is required"));
    }

    let prompt = format!(
        "Translate the following {} code to {}:\n\n{}\n\n\
         Please provide only the translated code without any explanations or comments.",
        request.source_language, request.target_language, request.source_code
    );

    let result = state
        .ollama
        .code_completion(&prompt, &request.target_language, 1024, 0.2)
        .await
        .map_err(|err| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Code translation failed: {err}"),
            )
        })?;

    tracing::info!(
        "code translated from {} to {}",
        request.source_language,
        request.target_language
    );
    Ok(Json(json!({
        "translated_code": result.response,
        "source_language": request.source_language,
        "target_language": request.target_language,
        "model": state.ollama.model(),
    })))
}

pub async fn code_languages() -> Json<serde_json::Value> {
    Json(json!({
        "languages": [
            {"value": "python", "label": "Python"},
            {"value": "javascript", "label": "JavaScript"},
            {"value": "java", "label": "Java"},
            {"value": "cpp", "label": "C++"},
            {"value": "html", "label": "HTML"},
            {"value": "css", "label": "CSS"},
            {"value": "go", "label": "Go"},
            {"value": "rust", "label": "Rust"},
            {"value": "php", "label": "PHP"},
            {"value": "ruby", "label": "Ruby"},
            {"value": "swift", "label": "Swift"},
            {"value": "kotlin", "label": "Kotlin"},
            {"value": "typescript", "label": "TypeScript"},
            {"value": "csharp", "label": "C#"},
        ]
    }))
}

async fn ensure_ollama(state: &AppState) -> Result<(), ApiError> {
    if !state.ollama.check_server().await {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Ollama server is not running",
        ));
    }
    Ok(())
}

fn validate_language(language: &str) -> Result<(), ApiError> {
    if SUPPORTED_LANGUAGES.contains(&language) {
        return Ok(());
    }
    Err(ApiError::new(
        StatusCode::BAD_REQUEST,
        format!(
            "Unsupported language: {}. Supported languages: {}",
            language,
            SUPPORTED_LANGUAGES.join(", ")
        ),
    ))
}

fn tokens_generated(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language() {
        assert!(validate_language("rust").is_ok());
        assert!(validate_language("csharp").is_ok());

        let err = validate_language("cobol").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.detail.contains("Unsupported language: cobol"));
    }

    #[test]
    fn test_chat_request_defaults() {
        let request: ChatGenerationRequest =
            serde_json::from_str(r#"{"messages": [{"role": "user", "content": "hi"}]}"#).unwrap();
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, 0.7);
    }

    #[test]
    fn test_code_request_defaults() {
        let request: CodeGenerationRequest =
            serde_json::from_str(r#"{"prompt": "fn main", "language": "rust"}"#).unwrap();
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.temperature, 0.3);
    }

    #[test]
    fn test_tokens_generated_counts_words() {
        assert_eq!(tokens_generated("fn main() {}\n"), 3);
        assert_eq!(tokens_generated(""), 0);
    }
}
