// Request interceptors composed around handlers with from_fn_with_state:
// cache_response for repeated GETs, rate_limit for per-client windows,
// security_headers on every response.

use axum::{
    body::{Body, HttpBody, to_bytes},
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::{ResponseCache, fingerprint};
use crate::error::AppError;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, RATE_LIMITED, REQUEST_LATENCY, REQUEST_TOTAL};
use crate::rate_limit::{RateLimiter, client_id};
use crate::state::CachedResponse;

pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");
pub const X_PROCESS_TIME: HeaderName = HeaderName::from_static("x-process-time");

// larger bodies are not worth keeping in memory
const MAX_CACHED_BODY: usize = 4 * 1024 * 1024;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
    ("x-robots-tag", "index, follow"),
];

// Serves a stored copy when one is fresh, otherwise runs the handler and
// stores successful responses. Failures are passed through uncached.
pub async fn cache_response(
    State(cache): State<Arc<ResponseCache<CachedResponse>>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = fingerprint(
        req.method().as_str(),
        req.uri().path(),
        req.uri().query().unwrap_or(""),
    );

    if let Some(hit) = cache.get(&key) {
        CACHE_HITS.inc();
        return Ok(replay(hit));
    }
    CACHE_MISSES.inc();

    // a clear while the handler runs means its result may already be stale
    let generation = cache.generation();
    let response = next.run(req).await;
    if !response.status().is_success() {
        return Ok(response);
    }

    // streamed or oversized bodies go out as they are
    let fits = response
        .body()
        .size_hint()
        .upper()
        .is_some_and(|len| len <= MAX_CACHED_BODY as u64);
    if !fits {
        return Ok(response);
    }

    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_CACHED_BODY)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to buffer response body: {}", e)))?;

    cache.insert_for_generation(
        key,
        CachedResponse {
            status: parts.status,
            content_type: parts.headers.get(CONTENT_TYPE).cloned(),
            body: bytes.clone(),
        },
        generation,
    );

    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    parts.headers.insert(X_CACHE, HeaderValue::from_static("MISS"));
    Ok(Response::from_parts(parts, Body::from(bytes)))
}

fn replay(hit: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(hit.body));
    *response.status_mut() = hit.status;
    if let Some(content_type) = hit.content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
        .headers_mut()
        .insert(X_CACHE, HeaderValue::from_static("HIT"));
    response
}

// checks the caller against `limiter` before the handler runs
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let client = client_id(req.headers(), peer);

    let decision = limiter.check(&client);
    if !decision.allowed {
        RATE_LIMITED.with_label_values(&[limiter.name()]).inc();
        return Err(AppError::RateLimited {
            retry_after: decision.retry_after_secs,
        });
    }

    Ok(next.run(req).await)
}

pub async fn security_headers(req: Request, next: Next) -> Response {
    let start = Instant::now();
    REQUEST_TOTAL.inc();

    let mut response = next.run(req).await;

    let elapsed = start.elapsed();
    REQUEST_LATENCY.observe(elapsed.as_secs_f64());

    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(*name, HeaderValue::from_static(*value));
    }
    let millis = format!("{:.2}", elapsed.as_secs_f64() * 1000.0);
    if let Ok(value) = HeaderValue::from_str(&millis) {
        headers.insert(X_PROCESS_TIME, value);
    }
    response
}
