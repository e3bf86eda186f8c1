// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::location::LocationKind;
use crate::types::LocationId;
use crate::validation::FieldId;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The candidate is missing required fields or carries invalid values.
    #[error("Candidate is not submittable; missing or invalid fields: {}", join_fields(.missing_fields))]
    ValidationFailed {
        /// Every field that is missing or invalid.
        missing_fields: BTreeSet<FieldId>,
    },
    /// A location selection does not belong to the selection one level up.
    #[error("Inconsistent location path at level {level}")]
    InvalidPath {
        /// The first level at which the path broke.
        level: LocationKind,
    },
    /// A location node violates the parent/kind ordering of the hierarchy.
    #[error("Invalid location node {node_id}: {reason}")]
    InvalidHierarchy {
        /// The offending node.
        node_id: LocationId,
        /// Description of the violation.
        reason: String,
    },
    /// The requested status change is not permitted by the lifecycle.
    #[error("Invalid status transition from '{from}' to '{to}': {reason}")]
    InvalidStatusTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// A status string could not be parsed.
    #[error("Invalid job order status: {status}")]
    InvalidStatus {
        /// The rejected value.
        status: String,
    },
    /// A connection type string could not be parsed.
    #[error("Invalid connection type: {value}")]
    InvalidConnectionType {
        /// The rejected value.
        value: String,
    },
    /// A location kind string could not be parsed.
    #[error("Invalid location kind: {value}")]
    InvalidLocationKind {
        /// The rejected value.
        value: String,
    },
    /// A media kind string could not be parsed.
    #[error("Invalid media kind: {value}")]
    InvalidMediaKind {
        /// The rejected value.
        value: String,
    },
    /// A field identifier string could not be parsed.
    #[error("Invalid field identifier: {value}")]
    InvalidFieldId {
        /// The rejected value.
        value: String,
    },
}

fn join_fields(fields: &BTreeSet<FieldId>) -> String {
    fields
        .iter()
        .map(FieldId::as_str)
        .collect::<Vec<&str>>()
        .join(", ")
}
