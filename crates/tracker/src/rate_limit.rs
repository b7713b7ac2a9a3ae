//! Minimum spacing between outbound provider calls.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Hands out call slots at least `min_interval` apart, across all tasks that
/// share the limiter. Waiting happens outside the lock, so concurrent
/// callers queue up on consecutive slots.
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the caller may issue its request.
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_calls_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_get_distinct_slots() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(200)));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut times = Vec::new();
        for handle in handles {
            times.push(handle.await.unwrap());
        }
        times.sort();

        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(200));
        }
        assert!(times[3] - start >= Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_period_does_not_bank_slots() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let resumed = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(resumed.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(limiter.min_interval().is_zero());
    }
}
