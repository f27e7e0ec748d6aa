// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-component message dispatch.
//!
//! A [`SimulationMessageHandler`] maps operations to callbacks. `register`
//! messages hand the sender's name to the callback and answer with a plain
//! informational string. Every other operation hands over the argument list
//! and wraps the callback result in a `response` message addressed back to
//! the sender. Operations without a callback are dropped without error.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::{SimError, SimResult};
use crate::message::SimulationMessage;
use crate::operation::Operation;

/// Input handed to a registered callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// Name of the registering component (`register` only).
    Sender(&'a str),
    /// Message arguments (every other operation).
    Args(&'a [Value]),
}

impl<'a> Payload<'a> {
    /// Arguments, or an empty slice for a `register` payload.
    pub fn args(&self) -> &'a [Value] {
        match *self {
            Self::Args(args) => args,
            Self::Sender(_) => &[],
        }
    }

    /// Sender name for a `register` payload.
    pub fn sender(&self) -> Option<&'a str> {
        match *self {
            Self::Sender(sender) => Some(sender),
            Self::Args(_) => None,
        }
    }
}

/// Callback stored under an operation.
pub type Callback = Box<dyn Fn(Payload<'_>) -> Value + Send + Sync>;

/// Result of dispatching a message to a registered callback.
#[derive(Debug, Clone, PartialEq)]
pub enum HandleOutcome {
    /// A `register` message was accepted: `"<sender> registered"`.
    Registered(String),
    /// Reply carrying the callback result as its only argument.
    Response(SimulationMessage),
}

impl HandleOutcome {
    /// Get the response message, if any.
    pub fn as_response(&self) -> Option<&SimulationMessage> {
        match self {
            Self::Response(msg) => Some(msg),
            Self::Registered(_) => None,
        }
    }

    /// Consume the outcome, keeping only a response message.
    pub fn into_response(self) -> Option<SimulationMessage> {
        match self {
            Self::Response(msg) => Some(msg),
            Self::Registered(_) => None,
        }
    }
}

/// Dispatches messages addressed to one named component.
pub struct SimulationMessageHandler {
    name: String,
    handlers: HashMap<Operation, Callback>,
}

impl SimulationMessageHandler {
    /// Create a handler for the component called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a callback for an operation.
    /// A later registration for the same operation replaces the earlier one.
    pub fn register_handler<F>(&mut self, operation: Operation, callback: F) -> bool
    where
        F: Fn(Payload<'_>) -> Value + Send + Sync + 'static,
    {
        tracing::debug!(handler = %self.name, operation = %operation, "Registering callback");
        self.handlers.insert(operation, Box::new(callback));
        true
    }

    /// Check if a callback is registered for `operation`.
    pub fn is_registered(&self, operation: &Operation) -> bool {
        self.handlers.contains_key(operation)
    }

    /// Operations with a registered callback, in no particular order.
    pub fn operations(&self) -> Vec<Operation> {
        self.handlers.keys().cloned().collect()
    }

    /// Process a message addressed to this handler.
    ///
    /// Returns `None` when no callback is registered for the operation.
    ///
    /// # Panics
    ///
    /// Panics if `message.target` is not this handler's name.
    pub fn handle_message(&self, message: &SimulationMessage) -> Option<HandleOutcome> {
        assert_eq!(
            message.target, self.name,
            "message for '{}' routed to handler '{}'",
            message.target, self.name
        );
        self.dispatch(message)
    }

    /// Same as [`handle_message`](Self::handle_message), but reports a
    /// mismatched target as [`SimError::MisroutedMessage`].
    pub fn try_handle_message(
        &self,
        message: &SimulationMessage,
    ) -> SimResult<Option<HandleOutcome>> {
        if message.target != self.name {
            return Err(SimError::MisroutedMessage {
                handler: self.name.clone(),
                target: message.target.clone(),
            });
        }
        Ok(self.dispatch(message))
    }

    /// Callable form, forwards to [`handle_message`](Self::handle_message).
    pub fn call(&self, message: &SimulationMessage) -> Option<HandleOutcome> {
        self.handle_message(message)
    }

    fn dispatch(&self, message: &SimulationMessage) -> Option<HandleOutcome> {
        let Some(callback) = self.handlers.get(&message.operation) else {
            tracing::trace!(
                handler = %self.name,
                sender = %message.sender,
                operation = %message.operation,
                "No callback registered, dropping message"
            );
            return None;
        };

        tracing::debug!(
            handler = %self.name,
            sender = %message.sender,
            operation = %message.operation,
            "Dispatching message"
        );

        if message.operation == Operation::REGISTER {
            callback(Payload::Sender(&message.sender));
            return Some(HandleOutcome::Registered(format!(
                "{} registered",
                message.sender
            )));
        }

        let result = callback(Payload::Args(&message.args));
        Some(HandleOutcome::Response(SimulationMessage {
            sender: self.name.clone(),
            target: message.sender.clone(),
            operation: Operation::RESPONSE,
            args: vec![result],
        }))
    }
}

impl fmt::Debug for SimulationMessageHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations: Vec<&str> = self.handlers.keys().map(Operation::as_str).collect();
        operations.sort_unstable();
        f.debug_struct("SimulationMessageHandler")
            .field("name", &self.name)
            .field("operations", &operations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn message(target: &str, operation: Operation, args: Vec<Value>) -> SimulationMessage {
        SimulationMessage::builder()
            .sender("ctrl")
            .target(target)
            .operation(operation)
            .args(args)
            .build()
            .unwrap()
    }

    fn doubling_motor() -> SimulationMessageHandler {
        let mut handler = SimulationMessageHandler::new("motor");
        handler.register_handler(Operation::SIMULATE, |payload| {
            json!(payload.args()[0].as_i64().unwrap_or_default() * 2)
        });
        handler
    }

    #[test]
    fn test_simulate_wraps_response() {
        let handler = doubling_motor();
        let outcome = handler
            .handle_message(&message("motor", Operation::SIMULATE, vec![json!(21)]))
            .unwrap();

        let response = outcome.into_response().unwrap();
        assert_eq!(response.sender, "motor");
        assert_eq!(response.target, "ctrl");
        assert_eq!(response.operation, Operation::RESPONSE);
        assert_eq!(response.args, vec![json!(42)]);
    }

    #[test]
    fn test_register_receives_sender() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut handler = SimulationMessageHandler::new("motor");
        let sink = Arc::clone(&seen);
        handler.register_handler(Operation::REGISTER, move |payload| {
            sink.lock()
                .unwrap()
                .push(payload.sender().unwrap_or_default().to_string());
            Value::Null
        });

        let outcome = handler
            .handle_message(&message("motor", Operation::REGISTER, vec![json!(1)]))
            .unwrap();

        assert_eq!(outcome, HandleOutcome::Registered("ctrl registered".to_string()));
        assert!(outcome.as_response().is_none());
        assert_eq!(*seen.lock().unwrap(), vec!["ctrl".to_string()]);
    }

    #[test]
    fn test_unregistered_operation_is_dropped() {
        let handler = doubling_motor();
        let outcome = handler.handle_message(&message("motor", Operation::DRY_RUN, vec![]));
        assert!(outcome.is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut handler = doubling_motor();
        assert!(handler.register_handler(Operation::SIMULATE, |_| json!("replaced")));

        let response = handler
            .call(&message("motor", Operation::SIMULATE, vec![json!(1)]))
            .and_then(HandleOutcome::into_response)
            .unwrap();
        assert_eq!(response.args, vec![json!("replaced")]);
        assert_eq!(handler.operations(), vec![Operation::SIMULATE]);
    }

    #[test]
    #[should_panic(expected = "routed to handler 'motor'")]
    fn test_wrong_target_panics() {
        let handler = doubling_motor();
        handler.handle_message(&message("pump", Operation::SIMULATE, vec![json!(1)]));
    }

    #[test]
    fn test_try_handle_wrong_target() {
        let handler = doubling_motor();
        let result = handler.try_handle_message(&message("pump", Operation::SIMULATE, vec![]));
        assert!(matches!(result, Err(SimError::MisroutedMessage { .. })));
    }

    #[test]
    fn test_debug_lists_operations() {
        let handler = doubling_motor();
        let debug = format!("{:?}", handler);
        assert!(debug.contains("motor"));
        assert!(debug.contains("simulate"));
    }
}
