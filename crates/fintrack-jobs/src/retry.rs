//! Retry policies with backoff and jitter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    /// Never retry.
    None,
    /// Constant delay between attempts.
    Fixed,
    /// Delay doubles (by `multiplier`) each attempt.
    Exponential,
}

/// Retry behaviour attached to a job.
///
/// Delays are computed from the number of the attempt that just failed,
/// so the first retry waits `initial_delay_ms` and an exponential policy
/// grows from there up to `max_delay_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub strategy: RetryStrategy,
    /// Retry attempts after the initial execution.
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Growth factor for the exponential strategy.
    pub multiplier: f64,
    /// Spread delays to avoid retry stampedes after an outage.
    pub jitter: bool,
    /// Fraction of the delay used as the jitter band width.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3)
    }
}

impl RetryPolicy {
    /// No retries; failures dead-letter immediately.
    pub fn none() -> Self {
        Self {
            strategy: RetryStrategy::None,
            max_retries: 0,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            multiplier: 1.0,
            jitter: false,
            jitter_factor: 0.0,
        }
    }

    /// Fixed delay between attempts.
    pub fn fixed(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            strategy: RetryStrategy::Fixed,
            max_retries,
            initial_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            multiplier: 1.0,
            jitter: false,
            jitter_factor: 0.0,
        }
    }

    /// Exponential backoff starting at one second, capped at one hour.
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            strategy: RetryStrategy::Exponential,
            max_retries,
            initial_delay_ms: 1_000,
            max_delay_ms: 3_600_000,
            multiplier: 2.0,
            jitter: true,
            jitter_factor: 0.1,
        }
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Whether the attempt that just failed (1-based) leaves retries.
    pub fn should_retry(&self, attempt: u32) -> bool {
        self.strategy != RetryStrategy::None && attempt <= self.max_retries
    }

    /// Delay before re-running after the given failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 || self.strategy == RetryStrategy::None {
            return Duration::ZERO;
        }

        let base = match self.strategy {
            RetryStrategy::None => 0,
            RetryStrategy::Fixed => self.initial_delay_ms,
            RetryStrategy::Exponential => {
                let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
                (self.initial_delay_ms as f64 * factor) as u64
            }
        };
        let capped = base.min(self.max_delay_ms);

        let millis = if self.jitter && self.jitter_factor > 0.0 {
            let band = (capped as f64 * self.jitter_factor) as u64;
            capped
                .saturating_sub(band / 2)
                .saturating_add(jitter_millis(band))
        } else {
            capped
        };

        Duration::from_millis(millis)
    }
}

/// Pseudo-random millisecond offset in `[0, band)`, seeded from the
/// clock. Only has to spread concurrent retries apart, not be uniform.
fn jitter_millis(band: u64) -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    if band == 0 {
        return 0;
    }
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    // SplitMix64 mixing step.
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31)) % band
}
