//! HTTP surface for the facegate service.
//!
//! API endpoints:
//! - GET  /                      - Welcome message
//! - POST /api/v1/users/signup   - Enroll a new identity from a face image
//! - POST /api/v1/users/login    - Authenticate against the enrolled population
//! - POST /api/v1/chat/generate  - Chat completion via Ollama
//! - POST /api/v1/code/generate  - Code generation via Ollama
//! - POST /api/v1/code/translate - Code translation via Ollama
//! - GET  /api/v1/code/languages - Supported language list

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use facegate_extract::{FaceExtractor, RemoteExtractor};
use facegate_faceid::{
    AuthDecision, AuthenticationService, EnrollmentService, FaceIdError, IdentityStore,
    MemoryStore, RedbStore,
};

use crate::config::Settings;
use crate::generate;
use crate::rate_limit::{self, RateLimiter};

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Clone)]
pub struct AppState {
    pub enroll: Arc<EnrollmentService>,
    pub auth: Arc<AuthenticationService>,
    pub ollama: Arc<facegate_ollama::Client>,
    pub limiter: Arc<RateLimiter>,
    pub settings: Arc<Settings>,
}

/// JSON error response with a FastAPI-style `detail` field.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<FaceIdError> for ApiError {
    fn from(err: FaceIdError) -> Self {
        match err {
            FaceIdError::ExtractionFailed => {
                ApiError::new(StatusCode::BAD_REQUEST, "Face detection failed")
            }
            FaceIdError::ExtractorUnavailable(reason) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Face extractor unavailable: {reason}"),
            ),
            FaceIdError::CapacityExceeded { capacity } => ApiError::new(
                StatusCode::FORBIDDEN,
                format!("User limit reached, {capacity} users allowed"),
            ),
            FaceIdError::NoEnrolledIdentities => {
                ApiError::new(StatusCode::NOT_FOUND, "No users found in database")
            }
            FaceIdError::Store(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred while accessing the identity store: {err}"),
            ),
        }
    }
}

/// Build the application state and serve until shutdown.
pub async fn run(settings: Settings, memory_store: bool) -> Result<()> {
    let store: Arc<dyn IdentityStore> = if memory_store {
        Arc::new(MemoryStore::new(settings.capacity, settings.dimension))
    } else {
        Arc::new(RedbStore::open(
            &settings.store_path,
            settings.capacity,
            settings.dimension,
        )?)
    };

    let extractor: Arc<dyn FaceExtractor> =
        Arc::new(RemoteExtractor::new(&settings.extractor_url, settings.dimension));

    let state = AppState {
        enroll: Arc::new(EnrollmentService::new(
            extractor.clone(),
            store.clone(),
            settings.capacity,
        )),
        auth: Arc::new(AuthenticationService::new(
            extractor,
            store,
            settings.default_threshold,
        )),
        ollama: Arc::new(facegate_ollama::Client::new(
            &settings.ollama_url,
            &settings.ollama_model,
        )),
        limiter: Arc::new(RateLimiter::new(settings.rate_limit_per_minute)),
        settings: Arc::new(settings.clone()),
    };

    let app = router(state, &settings);

    let addr: SocketAddr = settings.addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("facegated listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn router(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/v1/users/signup", post(signup))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/chat/generate", post(generate::chat_generate))
        .route("/api/v1/code/generate", post(generate::code_generate))
        .route("/api/v1/code/translate", post(generate::code_translate))
        .route("/api/v1/code/languages", get(generate::code_languages))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit,
        ))
        .layer(cors_layer(&settings.cors_origins))
        .layer(DefaultBodyLimit::max(settings.max_upload_mb * 1024 * 1024))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to facegate" }))
}

async fn signup(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let image = read_image_field(multipart).await?;

    let id = state.enroll.enroll(&image).await.map_err(|err| {
        tracing::warn!("signup failed: {}", err);
        ApiError::from(err)
    })?;

    tracing::info!("user created successfully with id {}", id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user_id": id,
        })),
    ))
}

async fn login(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let image = read_image_field(multipart).await?;

    let decision = state.auth.authenticate(&image).await.map_err(|err| {
        tracing::warn!("login failed: {}", err);
        ApiError::from(err)
    })?;

    match decision {
        AuthDecision::Accepted { id, similarity } => {
            tracing::info!("login successful for user {} with similarity {:.2}", id, similarity);
            Ok(Json(json!({
                "message": "Login successful",
                "user_id": id,
                "similarity": similarity,
            })))
        }
        AuthDecision::Rejected { best_similarity } => {
            tracing::warn!(
                "login failed, best match similarity ({:.2}) lower than threshold ({:.2})",
                best_similarity,
                state.settings.default_threshold
            );
            Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                format!(
                    "Login failed, best match similarity ({:.2}) lower than threshold ({:.2})",
                    best_similarity, state.settings.default_threshold
                ),
            ))
        }
    }
}

/// Pull the uploaded image out of the `file` multipart field, rejecting
/// anything that is not an allowed image content type.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid request format: {err}"),
        )
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "Invalid file type. Only JPEG, PNG, and WebP images are allowed.",
            ));
        }

        let bytes = field.bytes().await.map_err(|err| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("Failed to read upload: {err}"),
            )
        })?;
        return Ok(bytes.to_vec());
    }

    Err(ApiError::new(StatusCode::BAD_REQUEST, "Missing file upload"))
}
