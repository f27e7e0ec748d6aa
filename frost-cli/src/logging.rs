// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Subscriber setup with logical-time timestamps.

use std::fmt;

use frost_core::{f_convert, FrostConfig, SimulationClock, TimePrecision};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Stamps each log line with the current simulation time.
#[derive(Debug, Clone)]
pub struct LogicalTime {
    clock: SimulationClock,
    precision: TimePrecision,
}

impl LogicalTime {
    pub fn new(clock: SimulationClock, precision: TimePrecision) -> Self {
        Self { clock, precision }
    }
}

impl FormatTime for LogicalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", format_logical(self.clock.now(), self.precision))
    }
}

/// `nanos` expressed in `precision`, padded to 20 columns, followed by the unit.
pub fn format_logical(nanos: u64, precision: TimePrecision) -> String {
    let value = f_convert(nanos as f64, TimePrecision::Nsecs, precision);
    format!("{:<20} ({})", value, precision.unit())
}

/// Install the global subscriber.
pub fn init(config: &FrostConfig, verbose: bool, clock: SimulationClock) {
    let log_level = if verbose {
        "debug"
    } else {
        config.logging_level.as_filter()
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_timer(LogicalTime::new(clock, config.time_precision))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_logical() {
        assert_eq!(
            format_logical(1_500_000, TimePrecision::Msecs),
            "1.5                  (ms)"
        );
        assert_eq!(format_logical(42, TimePrecision::Nsecs), format!("{:<20} (ns)", 42));
    }

    #[test]
    fn test_timer_reads_shared_clock() {
        let clock = SimulationClock::new();
        let timer = LogicalTime::new(clock.clone(), TimePrecision::Usecs);
        clock.advance(2_000);

        let mut out = String::new();
        timer.format_time(&mut Writer::new(&mut out)).unwrap();
        assert!(out.starts_with("2 "));
        assert!(out.ends_with("(us)"));
    }
}
