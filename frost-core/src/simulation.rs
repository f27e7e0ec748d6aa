// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Simulation driver wiring participants, the orchestrator and the clock.
//!
//! Participants are stored in a DashMap keyed by name, so messages can be
//! delivered from several threads. Step proposals and their reduction share a
//! single lock around the orchestrator: a reduction only ever sees proposals
//! that were fully appended before it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{SimError, SimResult};
use crate::handler::{HandleOutcome, SimulationMessageHandler};
use crate::message::SimulationMessage;
use crate::stepper::{OrchestratorStepper, Step};
use crate::time::SimulationClock;

/// Participants, orchestrator and clock of one simulation run.
#[derive(Debug)]
pub struct Simulation {
    participants: DashMap<String, Arc<SimulationMessageHandler>>,
    orchestrator: Mutex<OrchestratorStepper>,
    clock: SimulationClock,
}

impl Simulation {
    /// Create an empty simulation starting at time zero.
    pub fn new() -> Self {
        Self::with_clock(SimulationClock::new())
    }

    /// Create an empty simulation driving an existing clock.
    pub fn with_clock(clock: SimulationClock) -> Self {
        let orchestrator = OrchestratorStepper::new(0, clock.now());
        Self {
            participants: DashMap::new(),
            orchestrator: Mutex::new(orchestrator),
            clock,
        }
    }

    /// Create a simulation wrapped in an Arc for sharing across threads.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Add a participant. Names must be unique.
    pub fn add_participant(&self, handler: SimulationMessageHandler) -> SimResult<()> {
        let name = handler.name().to_string();

        match self.participants.entry(name) {
            Entry::Occupied(entry) => Err(SimError::ParticipantAlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::info!(participant = %entry.key(), "Participant added");
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    /// Route a message to the participant named by its target.
    ///
    /// No map lock is held while the callback runs, so callbacks may add
    /// participants or deliver further messages.
    pub fn deliver(&self, message: &SimulationMessage) -> SimResult<Option<HandleOutcome>> {
        let handler = self
            .participants
            .get(&message.target)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SimError::ParticipantNotFound(message.target.clone()))?;

        handler.try_handle_message(message)
    }

    /// Propose the next step for the current tick.
    pub fn propose_step(&self, step: u64) {
        self.orchestrator().add_step(step);
    }

    /// Advance the clock to the next global event time.
    ///
    /// Returns the new simulation time. Fails with [`SimError::EmptyStepBuffer`]
    /// when no participant proposed a step, and with [`SimError::ClockOverflow`]
    /// when the step would move the clock past `u64::MAX`. On failure the
    /// proposals and the clock are left as they were.
    pub fn advance(&self) -> SimResult<u64> {
        let mut orchestrator = self.orchestrator();
        let step = OrchestratorStepper::compute_next_step(orchestrator.pending())?;
        let now = self.clock.advance(step).ok_or_else(|| SimError::ClockOverflow {
            now: self.clock.now(),
            step,
        })?;
        orchestrator.invoke()?;

        orchestrator.base.step = step;
        orchestrator.base.current_simulation_time = now;

        tracing::debug!(step, now, "Advanced simulation time");
        Ok(now)
    }

    /// Proposals collected since the last advance.
    pub fn pending_steps(&self) -> Vec<u64> {
        self.orchestrator().pending().to_vec()
    }

    /// Last step taken.
    pub fn last_step(&self) -> u64 {
        self.orchestrator().base.step
    }

    /// The clock driven by this simulation.
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Check if a participant exists.
    pub fn contains(&self, name: &str) -> bool {
        self.participants.contains_key(name)
    }

    /// Names of all participants, sorted.
    pub fn participants(&self) -> Vec<String> {
        let mut names: Vec<String> = self.participants.iter().map(|r| r.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Check if the simulation has no participants.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn orchestrator(&self) -> MutexGuard<'_, OrchestratorStepper> {
        // Every mutation under this lock is a single push or clear.
        self.orchestrator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use serde_json::{json, Value};

    fn echo(name: &str) -> SimulationMessageHandler {
        let mut handler = SimulationMessageHandler::new(name);
        handler.register_handler(Operation::SIMULATE, |payload| {
            Value::Array(payload.args().to_vec())
        });
        handler
    }

    #[test]
    fn test_add_and_deliver() {
        let sim = Simulation::new();
        sim.add_participant(echo("motor")).unwrap();

        let msg = SimulationMessage::builder()
            .sender("ctrl")
            .target("motor")
            .operation(Operation::SIMULATE)
            .arg(1)
            .build()
            .unwrap();

        let response = sim.deliver(&msg).unwrap().and_then(HandleOutcome::into_response);
        assert_eq!(response.unwrap().args, vec![json!([1])]);
    }

    #[test]
    fn test_duplicate_participant() {
        let sim = Simulation::new();
        sim.add_participant(echo("motor")).unwrap();
        assert!(matches!(
            sim.add_participant(echo("motor")),
            Err(SimError::ParticipantAlreadyExists(_))
        ));
        assert_eq!(sim.len(), 1);
    }

    #[test]
    fn test_participants_sorted() {
        let sim = Simulation::new();
        assert!(sim.is_empty());
        sim.add_participant(echo("motor")).unwrap();
        sim.add_participant(echo("ctrl")).unwrap();

        assert_eq!(sim.participants(), vec!["ctrl".to_string(), "motor".to_string()]);
        assert!(sim.contains("ctrl"));
        assert!(!sim.contains("pump"));
    }

    #[test]
    fn test_unknown_target() {
        let sim = Simulation::new();
        let msg = SimulationMessage::builder()
            .sender("ctrl")
            .target("pump")
            .operation(Operation::SIMULATE)
            .build()
            .unwrap();
        assert!(matches!(
            sim.deliver(&msg),
            Err(SimError::ParticipantNotFound(_))
        ));
    }

    #[test]
    fn test_advance_moves_clock() {
        let sim = Simulation::new();
        sim.propose_step(500);
        sim.propose_step(200);

        assert_eq!(sim.advance().unwrap(), 200);
        assert_eq!(sim.clock().now(), 200);
        assert_eq!(sim.last_step(), 200);
        assert!(sim.pending_steps().is_empty());

        sim.propose_step(300);
        assert_eq!(sim.advance().unwrap(), 500);
    }

    #[test]
    fn test_advance_without_proposals() {
        let sim = Simulation::new();
        assert!(matches!(sim.advance(), Err(SimError::EmptyStepBuffer)));
        assert_eq!(sim.clock().now(), 0);
    }

    #[test]
    fn test_shared_clock() {
        let clock = SimulationClock::new();
        clock.set(1_000);
        let sim = Simulation::with_clock(clock.clone());

        sim.propose_step(50);
        sim.advance().unwrap();
        assert_eq!(clock.now(), 1_050);
    }

    #[test]
    fn test_advance_overflow_keeps_state() {
        let sim = Simulation::new();
        sim.propose_step(u64::MAX);
        assert_eq!(sim.advance().unwrap(), u64::MAX);

        sim.propose_step(1);
        assert!(matches!(
            sim.advance(),
            Err(SimError::ClockOverflow { now: u64::MAX, step: 1 })
        ));
        assert_eq!(sim.clock().now(), u64::MAX);
        assert_eq!(sim.pending_steps(), vec![1]);
        assert_eq!(sim.last_step(), u64::MAX);

        sim.propose_step(5);
        assert_eq!(sim.pending_steps(), vec![1, 5]);
    }

    #[test]
    fn test_callback_reenters_simulation() {
        let sim = Simulation::new_shared();
        let mut handler = SimulationMessageHandler::new("motor");
        let weak = Arc::downgrade(&sim);
        handler.register_handler(Operation::SIMULATE, move |_| {
            if let Some(sim) = weak.upgrade() {
                for i in 0..32 {
                    let _ = sim.add_participant(echo(&format!("pump-{}", i)));
                }
                sim.propose_step(25);
            }
            Value::Null
        });
        sim.add_participant(handler).unwrap();

        let msg = SimulationMessage::builder()
            .sender("ctrl")
            .target("motor")
            .operation(Operation::SIMULATE)
            .build()
            .unwrap();
        sim.deliver(&msg).unwrap();
        assert_eq!(sim.len(), 33);
        assert_eq!(sim.advance().unwrap(), 25);
    }
}
