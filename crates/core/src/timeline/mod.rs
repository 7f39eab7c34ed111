use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;

/// Cooperative pacing primitive used between animation steps.
///
/// Implementations must not hold locks across the suspension point.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Suspends the calling step for `delay` when `enabled`, otherwise
    /// returns without delaying.
    async fn pace(&self, delay: Duration, enabled: bool);
}

/// Real timed suspension on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn pace(&self, delay: Duration, enabled: bool) {
        if enabled {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

/// Scheduler that never suspends. Counts how often it was asked to pace.
#[derive(Debug, Default)]
pub struct InstantScheduler {
    paces: AtomicUsize,
}

impl InstantScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paces(&self) -> usize {
        self.paces.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Scheduler for InstantScheduler {
    async fn pace(&self, _delay: Duration, _enabled: bool) {
        self.paces.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn paced_suspends_for_the_full_delay() {
        let scheduler = TokioScheduler::new();
        let started = Instant::now();

        scheduler.pace(Duration::from_millis(25), true).await;

        assert!(started.elapsed() >= Duration::from_millis(25));
    }

    #[tokio::test(start_paused = true)]
    async fn unpaced_ignores_the_delay() {
        let scheduler = TokioScheduler::new();
        let started = Instant::now();

        for _ in 0..100 {
            scheduler.pace(Duration::from_secs(1), false).await;
        }

        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn instant_scheduler_counts_calls() {
        let scheduler = InstantScheduler::new();
        scheduler.pace(Duration::from_secs(60), true).await;
        scheduler.pace(Duration::ZERO, false).await;

        assert_eq!(scheduler.paces(), 2);
    }
}
