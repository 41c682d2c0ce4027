use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::ResponseCache;
use crate::clock::Clock;
use crate::config::Args;
use crate::rate_limit::RateLimiter;
use crate::store::PortfolioStore;

// What the response cache keeps for a GET: enough to rebuild the response
#[derive(Clone, Debug)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

// app's shared state, built once in main and cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PortfolioStore>,
    pub cache: Arc<ResponseCache<CachedResponse>>,
    pub general_limiter: Arc<RateLimiter>, // broad API limit
    pub contact_limiter: Arc<RateLimiter>, // contact form only
    pub environment: String,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: &Args, store: Arc<dyn PortfolioStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            cache: Arc::new(ResponseCache::with_clock(args.cache_ttl(), clock.clone())),
            general_limiter: Arc::new(RateLimiter::with_clock(
                "general",
                args.rate_limit,
                args.rate_window(),
                clock.clone(),
            )),
            contact_limiter: Arc::new(RateLimiter::with_clock(
                "contact",
                args.contact_rate_limit,
                args.rate_window(),
                clock,
            )),
            environment: args.environment.clone(),
            started_at: Instant::now(),
        }
    }
}
