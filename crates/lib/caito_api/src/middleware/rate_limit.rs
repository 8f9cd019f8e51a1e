//! Per-IP rate limiting.
//!
//! Each limited route owns a [`RateLimiter`]: one keyed GCRA limiter per
//! configured [`Quota`], keyed by client IP. A request is admitted only when
//! every limiter has room. Limiters are checked shortest period first, so a
//! request turned away by the minute budget does not spend the daily one.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use tracing::{debug, warn};

use crate::config::Quota;
use crate::error::AppError;

/// Checks between sweeps of idle client state.
const RETAIN_EVERY: u64 = 1024;

/// Key used when the client address cannot be determined.
const UNKNOWN_CLIENT: &str = "unknown";

/// `limit` requests per `period`, refilled evenly across the period.
fn gcra_quota(quota: &Quota) -> Option<governor::Quota> {
    let burst = NonZeroU32::new(quota.limit)?;
    governor::Quota::with_period(quota.period / quota.limit).map(|q| q.allow_burst(burst))
}

/// Keyed request budgets for one route.
pub struct RateLimiter<C: Clock = DefaultClock> {
    clock: C,
    limiters: Vec<governor::RateLimiter<
        String,
        DefaultKeyedStateStore<String>,
        C,
        NoOpMiddleware<<C as Clock>::Instant>,
    >>,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new(quotas: &[Quota]) -> Self {
        Self::with_clock(quotas, DefaultClock::default())
    }
}

impl<C: Clock + Clone> RateLimiter<C> {
    pub fn with_clock(quotas: &[Quota], clock: C) -> Self {
        let mut quotas = quotas.to_vec();
        quotas.sort_by_key(|q| q.period);

        let limiters = quotas
            .iter()
            .filter_map(|quota| match gcra_quota(quota) {
                Some(gcra) => Some(governor::RateLimiter::new(
                    gcra,
                    DefaultKeyedStateStore::default(),
                    clock.clone(),
                )),
                None => {
                    warn!(?quota, "ignoring empty rate-limit quota");
                    None
                }
            })
            .collect();

        Self {
            clock,
            limiters,
            checks: AtomicU64::new(0),
        }
    }

    /// Count a request from `client`. On rejection returns how long until the
    /// exhausted budget admits another request.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        let key = client.to_string();
        let result = self.limiters.iter().try_for_each(|limiter| {
            limiter
                .check_key(&key)
                .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
        });

        if self.checks.fetch_add(1, Ordering::Relaxed) % RETAIN_EVERY == RETAIN_EVERY - 1 {
            self.limiters.iter().for_each(|limiter| limiter.retain_recent());
        }
        result
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.limiters.iter().map(|limiter| limiter.len()).max().unwrap_or(0)
    }
}

/// Resolve the caller's IP: socket peer, then the first `X-Forwarded-For`
/// hop, then a shared bucket.
pub fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Axum middleware: rejects the request with 429 when the caller is over
/// any quota of `limiter`.
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&request);
    if let Err(wait) = limiter.check(&client) {
        debug!(%client, path = %request.uri().path(), "rate limit exceeded");
        return Err(AppError::RateLimited {
            retry_after_secs: retry_after_secs(wait),
        });
    }
    Ok(next.run(request).await)
}

/// Whole seconds a client must wait, rounded up so a retry after
/// `Retry-After` is admitted.
fn retry_after_secs(wait: Duration) -> u64 {
    (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use governor::clock::FakeRelativeClock;

    use super::*;

    fn limiter(quotas: &[Quota]) -> (RateLimiter<FakeRelativeClock>, FakeRelativeClock) {
        let clock = FakeRelativeClock::default();
        (RateLimiter::with_clock(quotas, clock.clone()), clock)
    }

    #[test]
    fn admits_up_to_limit_then_rejects() {
        let (limiter, _) = limiter(&[Quota::per_minute(2)]);

        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());
        let wait = limiter.check("1.2.3.4").unwrap_err();
        assert!(wait > Duration::ZERO && wait <= Duration::from_secs(30), "{wait:?}");
    }

    #[test]
    fn clients_are_counted_separately() {
        let (limiter, _) = limiter(&[Quota::per_minute(1)]);

        assert!(limiter.check("1.1.1.1").is_ok());
        assert!(limiter.check("2.2.2.2").is_ok());
        assert!(limiter.check("1.1.1.1").is_err());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn budget_refills_after_period() {
        let (limiter, clock) = limiter(&[Quota::per_minute(1)]);

        assert!(limiter.check("c").is_ok());
        clock.advance(Duration::from_secs(45));
        let wait = limiter.check("c").unwrap_err();
        assert!(wait <= Duration::from_secs(15), "{wait:?}");

        clock.advance(Duration::from_secs(15));
        assert!(limiter.check("c").is_ok());
    }

    #[test]
    fn every_quota_must_have_room() {
        let (limiter, clock) = limiter(&[Quota::per_day(3), Quota::per_minute(10)]);

        for _ in 0..3 {
            assert!(limiter.check("c").is_ok());
            clock.advance(Duration::from_secs(61));
        }
        let wait = limiter.check("c").unwrap_err();
        assert!(wait > Duration::from_secs(60 * 60), "{wait:?}");
    }

    #[test]
    fn minute_rejections_do_not_spend_the_day() {
        let (limiter, clock) = limiter(&[Quota::per_minute(1), Quota::per_day(2)]);

        assert!(limiter.check("c").is_ok());
        assert!(limiter.check("c").is_err());
        assert!(limiter.check("c").is_err());
        // Day budget has spent 1 of 2, so the next minute is admitted.
        clock.advance(Duration::from_secs(60));
        assert!(limiter.check("c").is_ok());
    }

    #[test]
    fn empty_quota_is_ignored() {
        let (limiter, _) = limiter(&[Quota::per_minute(0)]);
        assert!(limiter.check("c").is_ok());
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(5_999)), 6);
        assert_eq!(retry_after_secs(Duration::from_millis(6_001)), 7);
        assert_eq!(retry_after_secs(Duration::from_secs(6)), 6);
        assert_eq!(retry_after_secs(Duration::from_millis(10)), 1);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }

    #[test]
    fn client_key_prefers_peer_address() {
        let mut request: Request = http::Request::builder()
            .header("x-forwarded-for", "9.9.9.9")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4242))));
        assert_eq!(client_key(&request), "10.0.0.1");
    }

    #[test]
    fn client_key_falls_back_to_forwarded_for() {
        let request: Request = http::Request::builder()
            .header("x-forwarded-for", " 203.0.113.7 , 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.7");

        let request: Request = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), UNKNOWN_CLIENT);
    }
}
