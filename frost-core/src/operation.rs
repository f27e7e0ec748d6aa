// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Operation tags and per-role operation registries.
//!
//! A role owns a closed, ordered set of operation tags. A derived role declares
//! only its additional names; its effective set is the union of every ancestor's
//! set followed by its own names, first occurrence wins.

use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A named instruction carried by a [`SimulationMessage`](crate::SimulationMessage).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Operation(Cow<'static, str>);

impl Operation {
    /// Announces the sender to the target.
    pub const REGISTER: Operation = Operation(Cow::Borrowed("register"));
    /// Asks the target to simulate with the message arguments.
    pub const SIMULATE: Operation = Operation(Cow::Borrowed("simulate"));
    /// Carries the result of a handled request back to its sender.
    pub const RESPONSE: Operation = Operation(Cow::Borrowed("response"));
    /// Added by the dry-run role.
    pub const DRY_RUN: Operation = Operation(Cow::Borrowed("dry_run"));

    /// Create a new operation tag with validation. Any non-empty string is a valid value.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "operation",
                value: name,
                reason: "Operation name cannot be empty".to_string(),
            });
        }

        Ok(Self(Cow::Owned(name)))
    }

    /// Get the tag value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-case constant-style name, e.g. `DRY_RUN` for `dry_run`.
    pub fn constant_name(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Operation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Operation {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.0.into_owned()
    }
}

/// Ordered union of operation lists, most-base list first.
///
/// Later duplicates are dropped, so an inherited entry keeps its position even
/// when a derived list declares it again.
pub fn merge_operations<T: Clone + PartialEq>(lists: &[&[T]]) -> Vec<T> {
    let mut merged: Vec<T> = Vec::new();
    for list in lists {
        for op in *list {
            if !merged.contains(op) {
                merged.push(op.clone());
            }
        }
    }
    merged
}

/// The effective operation set of one component role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRole {
    name: String,
    operations: Vec<Operation>,
}

impl OperationRole {
    /// Create a root role from its declared operation names.
    pub fn new(name: impl Into<String>, own: &[&str]) -> Result<Self, ValidationError> {
        let own = Self::parse_names(own)?;
        Ok(Self::merged(name.into(), &[], &own))
    }

    /// Derive a role that adds `own` to this role's operations.
    pub fn extend(&self, name: impl Into<String>, own: &[&str]) -> Result<Self, ValidationError> {
        let own = Self::parse_names(own)?;
        Ok(Self::merged(name.into(), &self.operations, &own))
    }

    /// The base role: `register`, `simulate`, `response`.
    pub fn base() -> &'static OperationRole {
        static BASE: OnceLock<OperationRole> = OnceLock::new();
        BASE.get_or_init(|| {
            Self::merged(
                "Operation".to_string(),
                &[],
                &[Operation::REGISTER, Operation::SIMULATE, Operation::RESPONSE],
            )
        })
    }

    /// The base role plus `dry_run`.
    pub fn dry_run() -> &'static OperationRole {
        static DRY_RUN: OnceLock<OperationRole> = OnceLock::new();
        DRY_RUN.get_or_init(|| {
            Self::merged(
                "DryRunOperation".to_string(),
                &Self::base().operations,
                &[Operation::DRY_RUN],
            )
        })
    }

    fn merged(name: String, inherited: &[Operation], own: &[Operation]) -> Self {
        Self {
            name,
            operations: merge_operations(&[inherited, own]),
        }
    }

    fn parse_names(names: &[&str]) -> Result<Vec<Operation>, ValidationError> {
        names.iter().map(|n| Operation::new(*n)).collect()
    }

    /// Get the role name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All operations of this role, inherited ones first.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Check whether `op` is a valid operation value for this role.
    pub fn contains(&self, op: impl AsRef<str>) -> bool {
        let op = op.as_ref();
        self.operations.iter().any(|o| o.as_str() == op)
    }

    /// Look up an operation by value.
    pub fn get(&self, op: &str) -> Result<&Operation, ValidationError> {
        self.operations
            .iter()
            .find(|o| o.as_str() == op)
            .ok_or_else(|| ValidationError::UnknownOperation {
                operation: op.to_string(),
                role: self.name.clone(),
            })
    }

    /// Number of operations in the role.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the role declares no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
