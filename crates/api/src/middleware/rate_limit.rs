//! Rate limiting middleware.
//!
//! Limits requests per caller. Authenticated callers are keyed by user id,
//! anonymous ones by client address.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter as GovRateLimiter,
};
use std::{net::SocketAddr, num::NonZeroU32};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::user_auth::UserAuth;

/// Tracked callers above which idle entries are pruned on the next check.
const RETAIN_THRESHOLD: usize = 10_000;

/// Identity a request is counted against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitKey {
    User(Uuid),
    Client(String),
}

impl RateLimitKey {
    /// Picks the key for a request: the authenticated user, else the
    /// first `X-Forwarded-For` hop, else the peer address.
    pub fn for_request(req: &Request<Body>) -> Self {
        if let Some(auth) = req.extensions().get::<UserAuth>() {
            return RateLimitKey::User(auth.user_id());
        }

        let forwarded = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(client) = forwarded {
            return RateLimitKey::Client(client.to_string());
        }

        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        RateLimitKey::Client(peer)
    }
}

/// Rate limiter state shared across all requests.
///
/// Callers whose budget has fully replenished are dropped once more than
/// `retain_threshold` callers are tracked.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<RateLimitKey>,
    rate_limit_per_minute: u32,
    retain_threshold: usize,
}

impl RateLimiterState {
    /// Create a limiter allowing `rate_limit_per_minute` requests per caller.
    ///
    /// Returns `None` when the limit is 0, which disables limiting.
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self::with_quota(
            Quota::per_minute(per_minute),
            rate_limit_per_minute,
            RETAIN_THRESHOLD,
        ))
    }

    fn with_quota(quota: Quota, rate_limit_per_minute: u32, retain_threshold: usize) -> Self {
        Self {
            limiter: GovRateLimiter::keyed(quota),
            rate_limit_per_minute,
            retain_threshold,
        }
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// Returns Ok(()) if allowed, or Err with retry_after seconds if limited.
    pub fn check(&self, key: &RateLimitKey) -> Result<(), u64> {
        let outcome = self.limiter.check_key(key);

        if self.limiter.len() > self.retain_threshold {
            self.retain_recent();
        }

        outcome.map_err(|not_until| {
            let wait_time = not_until.wait_time_from(DefaultClock::default().now());
            wait_time.as_secs().max(1)
        })
    }

    /// Drops callers whose budget has fully replenished.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    fn active_limiters(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.active_limiters())
            .finish()
    }
}

/// Middleware that applies rate limiting per caller.
///
/// Runs after authentication on protected routes so the user id is
/// available in request extensions.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        let key = RateLimitKey::for_request(&req);
        if let Err(retry_after_secs) = rate_limiter.check(&key) {
            tracing::warn!(?key, retry_after_secs, "Rate limit exceeded");
            metrics::counter!("rate_limit_rejections_total").increment(1);
            return ApiError::RateLimited {
                limit_per_minute: rate_limiter.rate_limit_per_minute(),
                retry_after_secs,
            }
            .into_response();
        }
    }

    next.run(req).await
}
