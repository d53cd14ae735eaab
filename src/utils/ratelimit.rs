//! Banking API rate limiter - sliding one-second window shared by every request
use lazy_static::lazy_static;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

const DEFAULT_REQUESTS_PER_SECOND: usize = 10;

lazy_static! {
    static ref API_RATE_LIMITER: Mutex<ApiRateLimiter> =
        Mutex::new(ApiRateLimiter::new(DEFAULT_REQUESTS_PER_SECOND));
}

pub struct ApiRateLimiter {
    /// Timestamps of requests inside the current window
    request_times: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl ApiRateLimiter {
    fn new(max_requests: usize) -> Self {
        Self {
            request_times: VecDeque::new(),
            max_requests: max_requests.max(1),
            window: Duration::from_secs(1),
        }
    }

    /// Record a request if there is room, otherwise return how long to wait
    fn check_and_record(&mut self, now: Instant) -> Duration {
        while let Some(&front) = self.request_times.front() {
            if now.duration_since(front) >= self.window {
                self.request_times.pop_front();
            } else {
                break;
            }
        }

        if self.request_times.len() >= self.max_requests {
            if let Some(&oldest) = self.request_times.front() {
                return self.window.saturating_sub(now.duration_since(oldest));
            }
        }

        self.request_times.push_back(now);
        Duration::ZERO
    }
}

fn limiter() -> MutexGuard<'static, ApiRateLimiter> {
    // A panic while holding the lock leaves the window intact
    match API_RATE_LIMITER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Change the process-wide request budget
pub fn set_requests_per_second(max_requests: usize) {
    limiter().max_requests = max_requests.max(1);
}

/// Wait until the request budget allows another call to the banking API
pub async fn rate_limit_api() {
    loop {
        let wait = limiter().check_and_record(Instant::now());
        if wait.is_zero() {
            return;
        }
        tracing::debug!("API rate limit: waiting {}ms", wait.as_millis());
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_requests_within_limit() {
        let mut limiter = ApiRateLimiter::new(10);
        let now = Instant::now();

        for _ in 0..10 {
            assert!(limiter.check_and_record(now).is_zero());
        }
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let mut limiter = ApiRateLimiter::new(3);
        let now = Instant::now();

        for _ in 0..3 {
            limiter.check_and_record(now);
        }

        let wait = limiter.check_and_record(now + Duration::from_millis(400));
        assert_eq!(wait, Duration::from_millis(600));
    }

    #[test]
    fn test_rate_limiter_frees_slots_after_window() {
        let mut limiter = ApiRateLimiter::new(2);
        let now = Instant::now();

        limiter.check_and_record(now);
        limiter.check_and_record(now);

        let later = now + Duration::from_secs(1);
        assert!(limiter.check_and_record(later).is_zero());
    }

    #[test]
    fn test_zero_budget_is_clamped() {
        let mut limiter = ApiRateLimiter::new(0);
        assert!(limiter.check_and_record(Instant::now()).is_zero());
    }
}
