// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `frost convert` command - Convert a time value between units.

use frost_core::{checked_convert, f_convert, TimePrecision};

pub fn execute(
    time: f64,
    from: TimePrecision,
    to: TimePrecision,
    round: bool,
    float: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(time, from = %from, to = %to, "Converting time");

    if !time.is_finite() {
        return Err(format!("Time value must be finite, got {}", time).into());
    }

    if float {
        println!("{} {}", f_convert(time, from, to), to.unit());
    } else {
        println!("{} {}", checked_convert(time, from, to, round)?, to.unit());
    }
    Ok(())
}
