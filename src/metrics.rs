use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, IntCounterVec, TextEncoder, register_counter,
    register_gauge, register_histogram, register_int_counter_vec,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("portfolio_requests_total", "Total number of requests")
            .expect("register portfolio_requests_total");
    pub static ref CACHE_HITS: Counter =
        register_counter!("portfolio_cache_hits_total", "Total cache hits")
            .expect("register portfolio_cache_hits_total");
    pub static ref CACHE_MISSES: Counter =
        register_counter!("portfolio_cache_misses_total", "Total cache misses")
            .expect("register portfolio_cache_misses_total");
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "portfolio_request_latency_seconds",
        "Request latency in seconds"
    )
    .expect("register portfolio_request_latency_seconds");
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("portfolio_cache_size", "Entries held by the response cache")
            .expect("register portfolio_cache_size");
    pub static ref RATE_LIMITED: IntCounterVec = register_int_counter_vec!(
        "portfolio_rate_limited_total",
        "Requests rejected by a rate limiter",
        &["limiter"]
    )
    .expect("register portfolio_rate_limited_total");
}

// Prometheus text exposition of the default registry
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("Failed to encode metrics: {}", e))?;
    String::from_utf8(buffer).map_err(|e| format!("Metrics are not UTF-8: {}", e))
}
