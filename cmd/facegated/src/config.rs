//! Daemon configuration, read from `FACEGATE_*` environment variables
//! with built-in defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_STORE_PATH: &str = "facegate.redb";
pub const DEFAULT_CAPACITY: usize = 50;
pub const DEFAULT_THRESHOLD: f32 = 0.6;
pub const DEFAULT_RATE_LIMIT: usize = 60;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Local development origins allowed by default.
const DEFAULT_CORS_ORIGINS: [&str; 5] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://localhost:80",
    "http://localhost:8000",
];

#[derive(Debug, Clone)]
pub struct Settings {
    /// Listen address.
    pub addr: String,

    /// Path to the redb identity database.
    pub store_path: PathBuf,

    /// Maximum number of enrolled identities.
    pub capacity: usize,

    /// System-wide acceptance threshold.
    pub default_threshold: f32,

    /// Embedding dimension, fixed at deployment.
    pub dimension: usize,

    /// Base URL of the face-embedding inference sidecar.
    pub extractor_url: String,

    /// Base URL of the Ollama server.
    pub ollama_url: String,

    /// Generation model name.
    pub ollama_model: String,

    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,

    /// Per-client request budget per minute.
    pub rate_limit_per_minute: usize,

    /// Upload size cap in megabytes.
    pub max_upload_mb: usize,
}

impl Settings {
    pub fn from_env() -> Self {
        let mut cors_origins: Vec<String> = DEFAULT_CORS_ORIGINS
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Ok(extra) = env::var("FACEGATE_CORS_ORIGINS") {
            cors_origins.extend(
                extra
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }

        Self {
            addr: env_or("FACEGATE_ADDR", DEFAULT_ADDR),
            store_path: PathBuf::from(env_or("FACEGATE_STORE_PATH", DEFAULT_STORE_PATH)),
            capacity: env_parse("FACEGATE_CAPACITY", DEFAULT_CAPACITY),
            default_threshold: env_parse("FACEGATE_THRESHOLD", DEFAULT_THRESHOLD),
            dimension: env_parse("FACEGATE_DIMENSION", facegate_extract::DEFAULT_DIMENSION),
            extractor_url: env_or("FACEGATE_EXTRACTOR_URL", facegate_extract::DEFAULT_BASE_URL),
            ollama_url: env_or("FACEGATE_OLLAMA_URL", facegate_ollama::DEFAULT_BASE_URL),
            ollama_model: env_or("FACEGATE_OLLAMA_MODEL", facegate_ollama::DEFAULT_MODEL),
            cors_origins,
            rate_limit_per_minute: env_parse("FACEGATE_RATE_LIMIT", DEFAULT_RATE_LIMIT),
            max_upload_mb: env_parse("FACEGATE_MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
