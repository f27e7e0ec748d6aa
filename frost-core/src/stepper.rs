// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Simulation time steppers.
//!
//! [`Stepper`] only holds a step duration and the current simulation time.
//! [`OrchestratorStepper`] collects step proposals from participants and
//! reduces them to the next global event time: the smallest proposal wins and
//! the buffer is cleared, so every participant proposes again after waking.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Something that can be invoked once per simulation tick.
pub trait Step {
    type Output;

    /// Run one tick.
    fn invoke(&mut self) -> Self::Output;
}

/// Step duration and current simulation time, both in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stepper {
    /// Time to simulate in this step.
    pub step: u64,
    /// Current simulation time.
    pub current_simulation_time: u64,
}

impl Stepper {
    pub fn new(step: u64, current_simulation_time: u64) -> Self {
        Self {
            step,
            current_simulation_time,
        }
    }
}

impl Step for Stepper {
    type Output = ();

    fn invoke(&mut self) {}
}

/// Reduces step proposals to the next global event time.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorStepper {
    /// Step and time bookkeeping shared with [`Stepper`].
    pub base: Stepper,
    steps: Vec<u64>,
}

impl OrchestratorStepper {
    pub fn new(step: u64, current_simulation_time: u64) -> Self {
        Self {
            base: Stepper::new(step, current_simulation_time),
            steps: Vec::new(),
        }
    }

    /// Append a step proposal. No bound, no deduplication.
    pub fn add_step(&mut self, step: u64) {
        self.steps.push(step);
    }

    /// Proposals collected since the last reduction.
    pub fn pending(&self) -> &[u64] {
        &self.steps
    }

    /// Smallest value of `values`.
    pub fn compute_next_step(values: &[u64]) -> SimResult<u64> {
        values.iter().copied().min().ok_or(SimError::EmptyStepBuffer)
    }

    /// Reduce the pending proposals and clear the buffer.
    /// Fails with [`SimError::EmptyStepBuffer`] when nothing was proposed.
    pub fn next_step(&mut self) -> SimResult<u64> {
        let next = Self::compute_next_step(&self.steps)?;
        tracing::debug!(
            proposals = self.steps.len(),
            next_step = next,
            "Reduced step proposals"
        );
        self.steps.clear();
        Ok(next)
    }
}

impl Step for OrchestratorStepper {
    type Output = SimResult<u64>;

    fn invoke(&mut self) -> SimResult<u64> {
        self.next_step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepper_is_passive() {
        let mut stepper = Stepper::new(10, 100);
        stepper.invoke();
        assert_eq!(stepper, Stepper::new(10, 100));

        stepper.current_simulation_time = 110;
        assert_eq!(stepper.current_simulation_time, 110);
    }

    #[test]
    fn test_minimum_wins_and_buffer_clears() {
        let mut orchestrator = OrchestratorStepper::new(0, 0);
        orchestrator.add_step(5);
        orchestrator.add_step(2);
        orchestrator.add_step(9);

        assert_eq!(orchestrator.invoke().unwrap(), 2);
        assert!(orchestrator.pending().is_empty());
        assert!(matches!(
            orchestrator.invoke(),
            Err(SimError::EmptyStepBuffer)
        ));
    }

    #[test]
    fn test_duplicates_kept() {
        let mut orchestrator = OrchestratorStepper::default();
        orchestrator.add_step(3);
        orchestrator.add_step(3);
        assert_eq!(orchestrator.pending(), &[3, 3]);
        assert_eq!(orchestrator.next_step().unwrap(), 3);
    }

    #[test]
    fn test_empty_reduction_fails() {
        assert!(OrchestratorStepper::compute_next_step(&[]).is_err());
        assert_eq!(OrchestratorStepper::compute_next_step(&[7, 4]).unwrap(), 4);
    }

    #[test]
    fn test_re_propose_after_wake() {
        let mut orchestrator = OrchestratorStepper::new(1, 0);
        orchestrator.add_step(8);
        assert_eq!(orchestrator.next_step().unwrap(), 8);

        orchestrator.add_step(12);
        orchestrator.add_step(6);
        assert_eq!(orchestrator.next_step().unwrap(), 6);
    }
}
