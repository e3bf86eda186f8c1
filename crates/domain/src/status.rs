// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job order status lifecycle and connection technology.
//!
//! A job order is created `InProgress` and leaves it through an operator
//! submission only. `Done` and `Failed` are terminal; `Reschedule` waits for
//! another visit and may be resubmitted to any outcome.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow status of a job order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOrderStatus {
    /// Assigned, visit not yet concluded
    InProgress,
    /// Installation completed
    Done,
    /// Installation could not be completed
    Failed,
    /// Visit must be repeated
    Reschedule,
}

impl JobOrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::InProgress, Self::Done, Self::Failed, Self::Reschedule];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Reschedule => "reschedule",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            "reschedule" => Ok(Self::Reschedule),
            _ => Err(DomainError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if no further transition may leave this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Staying `InProgress` is the assignment-form edit. Idempotent
    /// resubmission into a terminal status is decided by the workflow
    /// before this check and never reaches it.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::InProgress => true,
            Self::Reschedule => matches!(new_status, Self::Done | Self::Failed | Self::Reschedule),
            Self::Done | Self::Failed => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by job order lifecycle rules".to_string(),
            })
        }
    }
}

impl fmt::Display for JobOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Installation technology; decides which technical fields apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Antenna,
    Fiber,
    Local,
}

impl ConnectionType {
    pub const ALL: [Self; 3] = [Self::Antenna, Self::Fiber, Self::Local];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Antenna => "antenna",
            Self::Fiber => "fiber",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "antenna" => Ok(Self::Antenna),
            "fiber" => Ok(Self::Fiber),
            "local" => Ok(Self::Local),
            _ => Err(DomainError::InvalidConnectionType {
                value: s.to_string(),
            }),
        }
    }
}
