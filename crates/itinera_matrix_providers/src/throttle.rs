use std::{future::Future, time::Duration};

use parking_lot::Mutex;
use tokio::{
    sync::{Semaphore, SemaphorePermit},
    time::Instant,
};

/// Held while one oracle call is in flight.
pub struct ThrottleGuard<'a> {
    _permit: Option<SemaphorePermit<'a>>,
}

impl ThrottleGuard<'_> {
    pub fn unrestricted() -> Self {
        ThrottleGuard { _permit: None }
    }
}

/// Pacing policy applied around every distance oracle call.
pub trait Throttle: Send + Sync {
    fn acquire(&self) -> impl Future<Output = ThrottleGuard<'_>> + Send;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

impl Throttle for Unthrottled {
    fn acquire(&self) -> impl Future<Output = ThrottleGuard<'_>> + Send {
        std::future::ready(ThrottleGuard::unrestricted())
    }
}

/// Caps the number of oracle calls in flight.
pub struct ConcurrencyLimit {
    semaphore: Semaphore,
}

impl ConcurrencyLimit {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            semaphore: Semaphore::new(max_in_flight.max(1)),
        }
    }
}

impl Throttle for ConcurrencyLimit {
    fn acquire(&self) -> impl Future<Output = ThrottleGuard<'_>> + Send {
        async move {
            // The semaphore is never closed
            let permit = self.semaphore.acquire().await.ok();
            ThrottleGuard { _permit: permit }
        }
    }
}

/// Spaces the start of successive oracle calls by at least `interval`.
pub struct FixedInterval {
    interval: Duration,
    next_start: Mutex<Option<Instant>>,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_start: Mutex::new(None),
        }
    }

    fn reserve_slot(&self) -> Instant {
        let mut next_start = self.next_start.lock();
        let now = Instant::now();

        let slot = match *next_start {
            Some(next) if next > now => next,
            _ => now,
        };

        *next_start = Some(slot + self.interval);
        slot
    }
}

impl Throttle for FixedInterval {
    fn acquire(&self) -> impl Future<Output = ThrottleGuard<'_>> + Send {
        let slot = self.reserve_slot();

        async move {
            tokio::time::sleep_until(slot).await;
            ThrottleGuard::unrestricted()
        }
    }
}

/// Combination of an optional minimum spacing and an optional concurrency cap,
/// as configured by the deployment.
#[derive(Default)]
pub struct ThrottlePolicy {
    min_interval: Option<FixedInterval>,
    max_in_flight: Option<ConcurrencyLimit>,
}

impl ThrottlePolicy {
    pub fn new(min_interval: Option<Duration>, max_in_flight: Option<usize>) -> Self {
        Self {
            min_interval: min_interval.map(FixedInterval::new),
            max_in_flight: max_in_flight.map(ConcurrencyLimit::new),
        }
    }
}

impl Throttle for ThrottlePolicy {
    fn acquire(&self) -> impl Future<Output = ThrottleGuard<'_>> + Send {
        async move {
            let guard = match &self.max_in_flight {
                Some(limit) => limit.acquire().await,
                None => ThrottleGuard::unrestricted(),
            };

            if let Some(interval) = &self.min_interval {
                interval.acquire().await;
            }

            guard
        }
    }
}
