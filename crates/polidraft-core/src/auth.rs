//! Client-side login lockout policy.
//!
//! Independent of any server-side rate limiting: five consecutive
//! failures lock login locally for five minutes. The record is persisted
//! through [`crate::chat::store::UiStateStore`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Failures allowed before the lockout engages.
pub const MAX_ATTEMPTS: u32 = 5;

/// How long login stays locked after the threshold is reached.
pub fn lock_duration() -> Duration {
    Duration::minutes(5)
}

/// Persisted login-failure state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// Consecutive failures since the last success or lock.
    #[serde(default)]
    pub count: u32,
    /// When set and in the future, login is locked until this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,
}

/// Outcome of registering a login failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Still below the threshold; carries the remaining attempts.
    AttemptsLeft(u32),
    /// The threshold was reached and the lockout engaged.
    LockedOut,
}

impl LockoutRecord {
    /// True while the lock window is open.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// Time left in the lock window, if any.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self.locked_until {
            Some(until) if until > now => Some(until - now),
            _ => None,
        }
    }

    /// Registers one failed attempt.
    ///
    /// On reaching [`MAX_ATTEMPTS`] the counter resets and the lock
    /// window opens; otherwise the counter advances.
    pub fn register_failure(&self, now: DateTime<Utc>) -> (LockoutRecord, FailureOutcome) {
        let next = self.count + 1;
        if next >= MAX_ATTEMPTS {
            (
                LockoutRecord {
                    count: 0,
                    locked_until: Some(now + lock_duration()),
                },
                FailureOutcome::LockedOut,
            )
        } else {
            (
                LockoutRecord {
                    count: next,
                    locked_until: None,
                },
                FailureOutcome::AttemptsLeft(MAX_ATTEMPTS - next),
            )
        }
    }
}
