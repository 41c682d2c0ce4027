use axum::http::HeaderMap;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::clock::{Clock, SystemClock};

// Rate limit entry - arrival times inside the trailing window, oldest first
#[derive(Debug, Default)]
pub struct RateWindow {
    pub timestamps: VecDeque<Instant>,
}

impl RateWindow {
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.timestamps.front() {
            if now.duration_since(oldest) < window {
                break;
            }
            self.timestamps.pop_front();
        }
    }
}

// Outcome of a single RateLimiter::check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    // seconds until a slot frees up, zero when allowed
    pub retry_after_secs: u64,
}

// Per-client sliding window limiter.
// Client records are never removed; a quiet client keeps an empty window.
pub struct RateLimiter {
    name: &'static str,
    limit: u32,
    window: Duration,
    clients: DashMap<String, RateWindow>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(name: &'static str, limit: u32, window: Duration) -> Self {
        Self::with_clock(name, limit, window, Arc::new(SystemClock))
    }

    pub fn with_clock(
        name: &'static str,
        limit: u32,
        window: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            limit,
            window,
            clients: DashMap::new(),
            clock,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn check(&self, client_id: &str) -> RateDecision {
        let now = self.clock.now();

        // the shard lock is held from prune to push
        let mut entry = self.clients.entry(client_id.to_string()).or_default();
        entry.prune(now, self.window);

        if entry.timestamps.len() >= self.limit as usize {
            let retry_after_secs = entry
                .timestamps
                .front()
                .map(|&oldest| (oldest + self.window).saturating_duration_since(now))
                .map(ceil_secs)
                .unwrap_or(0)
                .max(1);
            warn!(
                limiter = self.name,
                client = client_id,
                retry_after = retry_after_secs,
                "Rate limit exceeded"
            );
            return RateDecision {
                allowed: false,
                retry_after_secs,
            };
        }

        entry.timestamps.push_back(now);
        RateDecision {
            allowed: true,
            retry_after_secs: 0,
        }
    }

    // distinct client ids seen so far
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

fn ceil_secs(d: Duration) -> u64 {
    if d.subsec_nanos() > 0 {
        d.as_secs() + 1
    } else {
        d.as_secs()
    }
}

// X-Forwarded-For (first hop) -> X-Real-IP -> peer address -> "unknown"
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    header("x-forwarded-for")
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
