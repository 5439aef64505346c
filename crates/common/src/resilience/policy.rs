//! Retry policy engine: attempt limits, exponential backoff, and the
//! per-attempt decision.
//!
//! The engine is stateless. Given an attempt number (starting at 1) and a
//! [`RetryPolicyConfig`] it always produces the same answer, except for the
//! optional jitter which only ever shortens the delay.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use super::classify::{classify, Classification, TransportOutcome};
use super::constants::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, MAX_BACKOFF_EXPONENT,
    MAX_MAX_ATTEMPTS, MIN_MAX_ATTEMPTS,
};
use crate::error::{CommonError, CommonResult};

/// Jitter applied on top of the exponential delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jitter {
    /// Use the computed delay as is
    #[default]
    None,
    /// Uniformly random between zero and the computed delay
    Full,
    /// Half the computed delay plus a random share of the other half
    Equal,
}

impl Jitter {
    /// Apply jitter to the calculated delay
    pub fn apply(self, delay: Duration) -> Duration {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        match self {
            Self::None => delay,
            Self::Full => Duration::from_millis(random_up_to(millis)),
            Self::Equal => {
                let half = millis / 2;
                Duration::from_millis(half + random_up_to(millis - half))
            }
        }
    }

    /// Lowercase name, as accepted by `FromStr`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Full => "full",
            Self::Equal => "equal",
        }
    }
}

impl fmt::Display for Jitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Jitter {
    type Err = CommonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "full" => Ok(Self::Full),
            "equal" => Ok(Self::Equal),
            other => Err(CommonError::config(format!("unknown jitter mode '{other}'"))),
        }
    }
}

fn random_up_to(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..=max)
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicyConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each further retry
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    pub jitter: Jitter,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: Jitter::None,
        }
    }
}

impl RetryPolicyConfig {
    /// Start from the defaults.
    pub fn builder() -> RetryPolicyConfigBuilder {
        RetryPolicyConfigBuilder::default()
    }

    /// Check the invariants: `1 <= max_attempts <= 100` and
    /// `max_delay >= base_delay`.
    pub fn validate(&self) -> CommonResult<()> {
        if !(MIN_MAX_ATTEMPTS..=MAX_MAX_ATTEMPTS).contains(&self.max_attempts) {
            return Err(CommonError::config(format!(
                "max_attempts must be between {} and {}, got {}",
                MIN_MAX_ATTEMPTS, MAX_MAX_ATTEMPTS, self.max_attempts
            )));
        }

        if self.base_delay > self.max_delay {
            return Err(CommonError::config(format!(
                "base_delay ({:?}) cannot be greater than max_delay ({:?})",
                self.base_delay, self.max_delay
            )));
        }

        Ok(())
    }

    /// Upper bound on the wall time of one logical call when every attempt
    /// runs into `attempt_timeout`.
    pub fn worst_case_latency(&self, attempt_timeout: Duration) -> Duration {
        let policy = RetryPolicy::new(self.clone());
        let delays = (1..self.max_attempts)
            .map(|attempt| policy.delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add);
        attempt_timeout.saturating_mul(self.max_attempts).saturating_add(delays)
    }
}

/// Builder for [`RetryPolicyConfig`] with validation on `build`
#[derive(Debug, Default)]
pub struct RetryPolicyConfigBuilder {
    config: RetryPolicyConfig,
}

impl RetryPolicyConfigBuilder {
    /// Total attempts, including the first.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Delay before the first retry.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    /// Cap applied to every computed delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    /// Randomization applied after capping.
    pub fn jitter(mut self, jitter: Jitter) -> Self {
        self.config.jitter = jitter;
        self
    }

    /// # Errors
    /// Returns a validation error when an invariant does not hold.
    pub fn build(self) -> CommonResult<RetryPolicyConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Why a call stopped without succeeding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The last outcome was not retryable
    Terminal,
    /// The last outcome was retryable but no attempts remain
    Exhausted,
}

/// Decision produced after each attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// The attempt produced a successful response
    Success,
    /// Wait `delay`, then make the next attempt
    Retry { delay: Duration },
    /// Stop and report the failure
    Fail { reason: FailureReason },
}

/// Stateless retry decision engine
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryPolicyConfig,
}

impl RetryPolicy {
    /// Wrap an already validated configuration.
    pub fn new(config: RetryPolicyConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &RetryPolicyConfig {
        &self.config
    }

    /// Total attempts allowed per call.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// True iff the outcome is retryable and `attempt` is not the last one.
    pub fn should_retry(&self, attempt: u32, classification: Classification) -> bool {
        classification.is_retryable() && attempt < self.config.max_attempts
    }

    /// Delay to wait after `attempt` fails: `base * 2^(attempt - 1)`, capped
    /// at `max_delay`. Attempt `0` is treated as `1`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        let multiplier = 2_u32.saturating_pow(exponent);
        self.config.base_delay.saturating_mul(multiplier).min(self.config.max_delay)
    }

    /// [`delay_for`](Self::delay_for) with the configured jitter applied.
    pub fn jittered_delay_for(&self, attempt: u32) -> Duration {
        self.config.jitter.apply(self.delay_for(attempt)).min(self.config.max_delay)
    }

    /// Combine classification, attempt limit, and backoff into one step.
    pub fn next_step(&self, attempt: u32, outcome: &TransportOutcome) -> RetryStep {
        if outcome.is_success() {
            return RetryStep::Success;
        }

        let classification = classify(outcome);
        if self.should_retry(attempt, classification) {
            RetryStep::Retry { delay: self.jittered_delay_for(attempt) }
        } else if classification.is_retryable() {
            RetryStep::Fail { reason: FailureReason::Exhausted }
        } else {
            RetryStep::Fail { reason: FailureReason::Terminal }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the retry policy engine
    //!
    //! Covers the default schedule, the delay cap, attempt limits, config
    //! validation, and jitter bounds.

    use super::super::classify::TransportFailureKind;
    use super::*;

    /// Validates the default delay schedule.
    ///
    /// Assertions:
    /// - Confirms attempts 1, 2, 3 wait 1s, 2s, 4s.
    /// - Confirms every later attempt is capped at 10s.
    #[test]
    fn test_default_delay_schedule() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(8));
        assert_eq!(policy.delay_for(5), Duration::from_secs(10));
        assert_eq!(policy.delay_for(50), Duration::from_secs(10));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_attempt_zero_is_treated_as_first() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), policy.delay_for(1));
    }

    /// Validates `should_retry` against the attempt limit.
    ///
    /// Assertions:
    /// - Confirms retryable outcomes retry on attempts 1 and 2 of 3.
    /// - Confirms attempt 3 of 3 never retries.
    /// - Confirms terminal outcomes never retry.
    #[test]
    fn test_should_retry_respects_max_attempts() {
        let policy = RetryPolicy::default();

        assert!(policy.should_retry(1, Classification::Retryable));
        assert!(policy.should_retry(2, Classification::Retryable));
        assert!(!policy.should_retry(3, Classification::Retryable));
        assert!(!policy.should_retry(1, Classification::Terminal));
    }

    #[test]
    fn test_next_step_for_each_outcome() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.next_step(1, &TransportOutcome::Status(201)), RetryStep::Success);
        assert_eq!(
            policy.next_step(1, &TransportOutcome::Status(503)),
            RetryStep::Retry { delay: Duration::from_secs(1) }
        );
        assert_eq!(
            policy.next_step(2, &TransportOutcome::Failure(TransportFailureKind::ReadTimeout)),
            RetryStep::Retry { delay: Duration::from_secs(2) }
        );
        assert_eq!(
            policy.next_step(3, &TransportOutcome::Status(503)),
            RetryStep::Fail { reason: FailureReason::Exhausted }
        );
        assert_eq!(
            policy.next_step(1, &TransportOutcome::Status(404)),
            RetryStep::Fail { reason: FailureReason::Terminal }
        );
        assert_eq!(
            policy.next_step(1, &TransportOutcome::Failure(TransportFailureKind::Unknown)),
            RetryStep::Fail { reason: FailureReason::Terminal }
        );
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let config = RetryPolicyConfig::builder().max_attempts(1).build().unwrap();
        let policy = RetryPolicy::new(config);

        assert_eq!(
            policy.next_step(1, &TransportOutcome::Status(500)),
            RetryStep::Fail { reason: FailureReason::Exhausted }
        );
    }

    #[test]
    fn test_builder_validation() {
        assert!(RetryPolicyConfig::builder().max_attempts(0).build().is_err());
        assert!(RetryPolicyConfig::builder().max_attempts(101).build().is_err());
        assert!(RetryPolicyConfig::builder()
            .base_delay(Duration::from_secs(20))
            .max_delay(Duration::from_secs(10))
            .build()
            .is_err());

        let config = RetryPolicyConfig::builder()
            .max_attempts(5)
            .base_delay(Duration::from_millis(100))
            .max_delay(Duration::from_millis(100))
            .jitter(Jitter::Equal)
            .build()
            .unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.jitter, Jitter::Equal);
    }

    #[test]
    fn test_custom_base_and_cap() {
        let config = RetryPolicyConfig::builder()
            .base_delay(Duration::from_millis(10))
            .max_delay(Duration::from_millis(25))
            .build()
            .unwrap();
        let policy = RetryPolicy::new(config);

        assert_eq!(policy.delay_for(1), Duration::from_millis(10));
        assert_eq!(policy.delay_for(2), Duration::from_millis(20));
        assert_eq!(policy.delay_for(3), Duration::from_millis(25));
    }

    /// Validates jitter bounds.
    ///
    /// Assertions:
    /// - Ensures full jitter stays within `[0, delay]`.
    /// - Ensures equal jitter stays within `[delay / 2, delay]`.
    #[test]
    fn test_jitter_bounds() {
        let delay = Duration::from_millis(1000);
        for _ in 0..200 {
            let full = Jitter::Full.apply(delay);
            assert!(full <= delay);

            let equal = Jitter::Equal.apply(delay);
            assert!(equal >= Duration::from_millis(500));
            assert!(equal <= delay);
        }
        assert_eq!(Jitter::None.apply(delay), delay);
        assert_eq!(Jitter::Full.apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_jitter_parsing() {
        assert_eq!("full".parse::<Jitter>().unwrap(), Jitter::Full);
        assert_eq!("EQUAL".parse::<Jitter>().unwrap(), Jitter::Equal);
        assert_eq!("".parse::<Jitter>().unwrap(), Jitter::None);
        assert!("sometimes".parse::<Jitter>().is_err());
    }

    #[test]
    fn test_worst_case_latency() {
        let config = RetryPolicyConfig::default();
        // 3 x 10s timeouts + 1s + 2s of backoff
        assert_eq!(config.worst_case_latency(Duration::from_secs(10)), Duration::from_secs(33));
    }
}
