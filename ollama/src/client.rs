use reqwest::Client as ReqwestClient;

use crate::error::OllamaError;
use crate::types::{
    ChatMessage, GenerateOptions, GenerateRequest, GenerateResponse, ModelInfo, TagsResponse,
};

/// Default Ollama server URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "codellama:7b";

/// Ollama API client.
///
/// Stateless pass-through to an Ollama server: liveness check, text
/// generation, and the prompt shaping for chat and code completion.
pub struct Client {
    http: ReqwestClient,
    base_url: String,
    model: String,
}

impl Client {
    /// Creates a client for the given server URL and model.
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns true if the Ollama server answers `GET /api/tags`.
    pub async fn check_server(&self) -> bool {
        match self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Lists the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, OllamaError> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models)
    }

    /// Generates text for the given request (non-streaming).
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, OllamaError> {
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Generates a code completion with a language-targeted system prompt.
    pub async fn code_completion(
        &self,
        prompt: &str,
        language: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<GenerateResponse, OllamaError> {
        let system = format!(
            "You are a helpful coding assistant. Generate code in {language} language. \
             Only provide the code without explanations."
        );

        self.generate(&GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            system: Some(system),
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature,
                ..GenerateOptions::default()
            },
        })
        .await
    }

    /// Generates a chat completion.
    ///
    /// The model is driven through `/api/generate`, so the conversation
    /// is flattened into a `User:`/`Assistant:` transcript; a system
    /// message, when present, rides along as the system prompt.
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<GenerateResponse, OllamaError> {
        let (prompt, system) = flatten_messages(messages);

        self.generate(&GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            system,
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature,
                ..GenerateOptions::default()
            },
        })
        .await
    }
}

fn flatten_messages(messages: &[ChatMessage]) -> (String, Option<String>) {
    let mut prompt = String::new();
    let mut system = None;

    for message in messages {
        match message.role.as_str() {
            "system" => system = Some(message.content.clone()),
            "assistant" => {
                prompt.push_str("Assistant: ");
                prompt.push_str(&message.content);
                prompt.push('\n');
            }
            _ => {
                prompt.push_str("User: ");
                prompt.push_str(&message.content);
                prompt.push('\n');
            }
        }
    }
    prompt.push_str("Assistant: ");

    (prompt, system)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: &str, content: &str) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_base_url_normalized() {
        let client = Client::new("http://ollama:11434/", DEFAULT_MODEL);
        assert_eq!(client.base_url, "http://ollama:11434");
        assert_eq!(client.model(), "codellama:7b");
    }

    #[test]
    fn test_flatten_transcript() {
        let (prompt, system) = flatten_messages(&[
            message("system", "Be brief."),
            message("user", "hi"),
            message("assistant", "hello"),
            message("user", "bye"),
        ]);

        assert_eq!(system.as_deref(), Some("Be brief."));
        assert_eq!(prompt, "User: hi\nAssistant: hello\nUser: bye\nAssistant: ");
    }

    #[test]
    fn test_flatten_without_system() {
        let (prompt, system) = flatten_messages(&[message("user", "hi")]);
        assert!(system.is_none());
        assert_eq!(prompt, "User: hi\nAssistant: ");
    }
}
