// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Time units and conversions.
//!
//! Simulation time is kept in nanoseconds. [`TimePrecision`] values are the
//! number of nanoseconds in one unit, so converting is a single ratio.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Time unit, valued in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimePrecision {
    Nsecs,
    Usecs,
    Msecs,
    Secs,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimePrecision {
    /// All precisions, finest first.
    pub const ALL: [TimePrecision; 8] = [
        Self::Nsecs,
        Self::Usecs,
        Self::Msecs,
        Self::Secs,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
    ];

    /// Nanoseconds in one unit.
    pub const fn nanos(&self) -> u64 {
        match self {
            Self::Nsecs => 1,
            Self::Usecs => 1_000,
            Self::Msecs => 1_000_000,
            Self::Secs => 1_000_000_000,
            Self::Minutes => 60 * 1_000_000_000,
            Self::Hours => 60 * 60 * 1_000_000_000,
            Self::Days => 24 * 60 * 60 * 1_000_000_000,
            Self::Weeks => 7 * 24 * 60 * 60 * 1_000_000_000,
        }
    }

    /// Upper-case name as used in configuration files.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nsecs => "NSECS",
            Self::Usecs => "USECS",
            Self::Msecs => "MSECS",
            Self::Secs => "SECS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
            Self::Weeks => "WEEKS",
        }
    }

    /// Short unit label for log output.
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Nsecs => "ns",
            Self::Usecs => "us",
            Self::Msecs => "ms",
            Self::Secs => "s",
            Self::Minutes => "min",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
        }
    }
}

impl fmt::Display for TimePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TimePrecision {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::InvalidFieldValue {
                field: "time_precision",
                value: s.to_string(),
                reason: "Expected one of NSECS, USECS, MSECS, SECS, MINUTES, HOURS, DAYS, WEEKS"
                    .to_string(),
            })
    }
}

/// Convert `time` between units, without truncation.
pub fn f_convert(time: f64, from: TimePrecision, to: TimePrecision) -> f64 {
    time * (from.nanos() as f64 / to.nanos() as f64)
}

/// Convert `time` between units to a whole number.
///
/// Floors the result, or rounds half to even when `rounding` is set. Results
/// outside the `i64` range saturate and NaN maps to zero; use
/// [`checked_convert`] to reject those inputs instead.
pub fn convert(time: f64, from: TimePrecision, to: TimePrecision, rounding: bool) -> i64 {
    let value = f_convert(time, from, to);
    if rounding {
        value.round_ties_even() as i64
    } else {
        value.floor() as i64
    }
}

/// Same as [`convert`], but rejects non-finite input and results that do not
/// fit in an `i64`.
pub fn checked_convert(
    time: f64,
    from: TimePrecision,
    to: TimePrecision,
    rounding: bool,
) -> Result<i64, ValidationError> {
    let value = f_convert(time, from, to);
    let whole = if rounding {
        value.round_ties_even()
    } else {
        value.floor()
    };

    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if !whole.is_finite() || whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return Err(ValidationError::InvalidFieldValue {
            field: "time",
            value: time.to_string(),
            reason: format!("Result in {} does not fit in a 64-bit integer", to.name()),
        });
    }
    Ok(whole as i64)
}

/// Shared simulation time in nanoseconds.
///
/// Clones observe the same clock, so the logger and the simulation driver
/// can hold it independently.
#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    nanos: Arc<AtomicU64>,
}

impl SimulationClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in nanoseconds.
    pub fn now(&self) -> u64 {
        self.nanos.load(Ordering::Acquire)
    }

    /// Current simulation time expressed in `precision`.
    pub fn now_in(&self, precision: TimePrecision) -> f64 {
        f_convert(self.now() as f64, TimePrecision::Nsecs, precision)
    }

    /// Move the clock forward and return the new time.
    ///
    /// Returns `None` and leaves the clock unchanged if the new time would not
    /// fit in a `u64`.
    pub fn advance(&self, delta: u64) -> Option<u64> {
        self.nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                now.checked_add(delta)
            })
            .ok()
            .map(|previous| previous + delta)
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, nanos: u64) {
        self.nanos.store(nanos, Ordering::Release);
    }
}
