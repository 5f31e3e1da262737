// src/socket/backoff.rs

//! Exponential backoff used when dialing the unix socket.
//!
//! The delay before retry `n` is `initial × multiplier^n`, capped at
//! `max_interval`, then randomized by `± randomization_factor`. Once the next
//! delay would push the total elapsed time past `max_elapsed`, the backoff
//! gives up and [`ExponentialBackoff::next_delay`] returns `None`.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Stateful exponential backoff with an overall deadline.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub initial: Duration,
    pub multiplier: f64,
    pub randomization_factor: f64,
    pub max_interval: Duration,
    pub max_elapsed: Duration,
    attempt: u32,
    started: Instant,
}

impl ExponentialBackoff {
    /// Backoff with the default tuning and the given overall deadline.
    pub fn new(max_elapsed: Duration) -> Self {
        Self {
            initial: DEFAULT_INITIAL_INTERVAL,
            multiplier: DEFAULT_MULTIPLIER,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed,
            attempt: 0,
            started: Instant::now(),
        }
    }

    pub fn with_initial(mut self, initial: Duration) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Restart the clock and the attempt counter.
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.started = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Delay to wait before the next attempt, or `None` when the deadline
    /// would be exceeded.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let base = self.base_interval(self.attempt);
        let delay = randomize(base, self.randomization_factor);
        if self.elapsed() + delay > self.max_elapsed {
            return None;
        }
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }

    fn base_interval(&self, attempt: u32) -> Duration {
        let exp = attempt.min(i32::MAX as u32) as i32;
        let secs = self.initial.as_secs_f64() * self.multiplier.powi(exp);
        let max_secs = self.max_interval.as_secs_f64();
        if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.max_interval
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

/// Pick uniformly in `[base × (1 - factor), base × (1 + factor)]`.
fn randomize(base: Duration, factor: f64) -> Duration {
    let ms = base.as_millis() as u64;
    if ms == 0 || factor <= 0.0 {
        return base;
    }
    let delta = (ms as f64 * factor) as u64;
    let low = ms.saturating_sub(delta);
    let high = ms.saturating_add(delta);
    Duration::from_millis(rand::rng().random_range(low..=high))
}
