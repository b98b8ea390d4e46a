use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::extractor::FaceExtractor;

/// Default inference sidecar base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9090";

/// FaceNet-style embedding dimension.
pub const DEFAULT_DIMENSION: usize = 512;

/// Client for a face-embedding inference sidecar.
///
/// The sidecar owns the detection and embedding models as a
/// process-wide resource with its own load lifecycle; this client only
/// depends on its behavioral contract. POST `/embeddings` with a
/// base64-encoded image returns `{"embedding": [...]}` on success or
/// `{"embedding": null}` when no face was found.
pub struct RemoteExtractor {
    client: Client,
    base_url: String,
    dim: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Option<Vec<f32>>,
}

impl RemoteExtractor {
    pub fn new(base_url: &str, dimension: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            dim: dimension,
        }
    }
}

#[async_trait::async_trait]
impl FaceExtractor for RemoteExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Option<Vec<f32>>, ExtractError> {
        let encoded = BASE64.encode(image);
        let request = EmbedRequest { image: &encoded };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ExtractError::Unavailable(e.to_string())
                } else {
                    ExtractError::Api(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Api(format!("unexpected status {status}")));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Api(e.to_string()))?;

        match body.embedding {
            Some(v) if v.len() == self.dim => Ok(Some(v)),
            Some(v) => Err(ExtractError::Api(format!(
                "unexpected embedding dimension: got {}, want {}",
                v.len(),
                self.dim
            ))),
            None => Ok(None),
        }
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
