//! Frost Core Library
//!
//! Simulation message-passing scaffold: per-role operation registries,
//! simulation messages and their builder, per-component message handlers,
//! and steppers that reduce step proposals to the next global event time.
//! Also provides time-unit conversion, a shared simulation clock, the
//! environment configuration loader and a small simulation driver.

pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod operation;
pub mod simulation;
pub mod stepper;
pub mod time;

// Re-export commonly used types
pub use config::{ConfigLoader, FrostConfig, LogLevel};
pub use error::{SimError, SimResult, ValidationError};
pub use handler::{Callback, HandleOutcome, Payload, SimulationMessageHandler};
pub use message::{SimulationMessage, SimulationMessageBuilder};
pub use operation::{merge_operations, Operation, OperationRole};
pub use simulation::Simulation;
pub use stepper::{OrchestratorStepper, Step, Stepper};
pub use time::{checked_convert, convert, f_convert, SimulationClock, TimePrecision};
