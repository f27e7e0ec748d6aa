// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `frost demo` command - Run the controller/motor simulation.
//!
//! `ctrl` registers with `motor`, then asks it to simulate on every wake-up.
//! Both participants propose their next wake-up and the orchestrator advances
//! the shared clock to the earliest one.

use std::sync::{Arc, Mutex};

use frost_core::{
    HandleOutcome, Operation, Simulation, SimulationClock, SimulationMessage,
    SimulationMessageHandler, TimePrecision,
};
use serde_json::{json, Value};

/// Controller wake-up period.
const CTRL_PERIOD_NS: u64 = 10 * 1_000_000;
/// Motor wake-up period.
const MOTOR_PERIOD_NS: u64 = 25 * 1_000_000;

pub fn execute(ticks: u32, clock: SimulationClock) -> Result<(), Box<dyn std::error::Error>> {
    let sim = Simulation::with_clock(clock);
    let received = Arc::new(Mutex::new(Vec::new()));

    sim.add_participant(motor())?;
    sim.add_participant(controller(Arc::clone(&received)))?;

    let register = SimulationMessage::builder()
        .sender("ctrl")
        .target("motor")
        .operation(Operation::REGISTER)
        .build()?;
    if let Some(HandleOutcome::Registered(info)) = sim.deliver(&register)? {
        tracing::info!("{}", info);
    }

    let mut ctrl_wake = CTRL_PERIOD_NS;
    let mut motor_wake = MOTOR_PERIOD_NS;

    for tick in 0..ticks {
        let now = sim.clock().now();
        sim.propose_step(ctrl_wake - now);
        sim.propose_step(motor_wake - now);
        let now = sim.advance()?;

        if now == ctrl_wake {
            ctrl_wake += CTRL_PERIOD_NS;
            let request = SimulationMessage::builder()
                .sender("ctrl")
                .target("motor")
                .operation(Operation::SIMULATE)
                .arg(tick)
                .build()?;
            tracing::debug!(message = %request, "Sending request");

            if let Some(response) = sim.deliver(&request)?.and_then(HandleOutcome::into_response) {
                sim.deliver(&response)?;
            }
        }
        if now == motor_wake {
            motor_wake += MOTOR_PERIOD_NS;
            tracing::info!(target_time = now, "Motor woke up");
        }
    }

    let received = received.lock().map_err(|_| "controller state poisoned")?;
    println!(
        "Ran {} tick(s), simulation time {} ms, controller received {:?}",
        ticks,
        sim.clock().now_in(TimePrecision::Msecs),
        *received
    );
    Ok(())
}

fn motor() -> SimulationMessageHandler {
    let mut handler = SimulationMessageHandler::new("motor");
    handler.register_handler(Operation::REGISTER, |payload| {
        tracing::info!(peer = payload.sender().unwrap_or_default(), "Peer registered");
        Value::Null
    });
    handler.register_handler(Operation::SIMULATE, |payload| {
        let input = payload.args().first().and_then(Value::as_i64).unwrap_or_default();
        json!(input * 2)
    });
    handler
}

fn controller(received: Arc<Mutex<Vec<Value>>>) -> SimulationMessageHandler {
    let mut handler = SimulationMessageHandler::new("ctrl");
    handler.register_handler(Operation::RESPONSE, move |payload| {
        tracing::info!(args = ?payload.args(), "Response received");
        if let Ok(mut received) = received.lock() {
            received.extend(payload.args().iter().cloned());
        }
        Value::Null
    });
    handler
}
