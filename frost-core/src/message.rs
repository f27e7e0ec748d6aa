// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Simulation messages and their builder.
//!
//! Messages are plain value holders. They are only constructed through
//! [`SimulationMessageBuilder`], which refuses to build without a sender,
//! a target and an operation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::operation::Operation;

/// A directed instruction from one component to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMessage {
    /// Name of the sending component.
    pub sender: String,
    /// Name of the component expected to handle the message.
    pub target: String,
    /// What the target is asked to do.
    pub operation: Operation,
    /// Opaque, ordered arguments.
    pub args: Vec<Value>,
}

impl SimulationMessage {
    /// Returns a new builder for creating messages.
    pub fn builder() -> SimulationMessageBuilder {
        SimulationMessageBuilder::new()
    }
}

impl fmt::Display for SimulationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SimulationMessage(sender='{}', target='{}', operation={}, args=[",
            self.sender,
            self.target,
            self.operation.constant_name()
        )?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, "])")
    }
}

/// Builder for [`SimulationMessage`].
#[derive(Debug, Clone, Default)]
pub struct SimulationMessageBuilder {
    sender: Option<String>,
    target: Option<String>,
    operation: Option<Operation>,
    args: Vec<Value>,
}

impl SimulationMessageBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender of the message.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Set the target of the message.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the operation for the message.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Replace the argument list.
    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Construct the message.
    /// Fails if sender, target or operation is unset.
    pub fn build(self) -> Result<SimulationMessage, ValidationError> {
        let sender = self.sender.ok_or_else(|| missing("sender"))?;
        let target = self.target.ok_or_else(|| missing("target"))?;
        let operation = self.operation.ok_or_else(|| missing("operation"))?;

        Ok(SimulationMessage {
            sender,
            target,
            operation,
            args: self.args,
        })
    }
}

fn missing(field: &'static str) -> ValidationError {
    ValidationError::MissingRequiredField {
        field,
        context: "SimulationMessage".to_string(),
    }
}
