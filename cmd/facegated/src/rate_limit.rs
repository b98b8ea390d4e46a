//! Per-client sliding-window rate limiting.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::server::{ApiError, AppState};

const WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window request counter keyed by client IP.
pub struct RateLimiter {
    requests_per_minute: usize,
    requests: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: usize) -> Self {
        Self {
            requests_per_minute,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` and return whether it is within
    /// the per-minute budget. Requests older than the window are
    /// dropped on every call, so the map never grows past one window of
    /// traffic per client.
    pub fn is_allowed(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock().unwrap();
        let entry = requests.entry(client).or_default();

        entry.retain(|at| now.duration_since(*at) < WINDOW);
        if entry.len() >= self.requests_per_minute {
            return false;
        }
        entry.push(now);
        true
    }
}

pub async fn rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.limiter.is_allowed(addr.ip()) {
        return Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests. Please try again later.",
        ));
    }
    Ok(next.run(request).await)
}
