//! Middleware for rate limiting.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

use crate::models::ErrorReply;

/// Rate limiter type alias
pub type AppRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter configuration
#[derive(Clone)]
pub struct RateLimitConfig {
    /// Requests per second
    pub requests_per_second: u32,
    /// Burst size
    pub burst_size: u32,
    /// Whether rate limiting is enabled
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 20,
            enabled: true,
        }
    }
}

impl RateLimitConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let rps = std::env::var("ODORLY_API_RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let burst = std::env::var("ODORLY_API_RATE_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);

        let enabled = std::env::var("ODORLY_API_RATE_ENABLED")
            .map(|s| s != "false" && s != "0")
            .unwrap_or(true);

        Self {
            requests_per_second: rps,
            burst_size: burst,
            enabled,
        }
    }

    /// Create a rate limiter from this config
    pub fn create_limiter(&self) -> Arc<AppRateLimiter> {
        let rps = NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rps).allow_burst(burst);

        Arc::new(RateLimiter::direct(quota))
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State((limiter, config)): State<(Arc<AppRateLimiter>, RateLimitConfig)>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health check
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    // If rate limiting is disabled, proceed
    if !config.enabled {
        return next.run(request).await;
    }

    // Check rate limit
    match limiter.check() {
        Ok(_) => next.run(request).await,
        Err(_) => {
            let error = ErrorReply::new("Too many requests");
            (StatusCode::TOO_MANY_REQUESTS, Json(error)).into_response()
        }
    }
}
