// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator identity and role checks.

use std::fmt;
use std::str::FromStr;

use fieldops_audit::Actor;

use crate::error::AuthError;

/// Operator roles.
///
/// Roles apply to the people operating the system, never to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Field technicians fill in and submit job-order forms.
    Technician,
    /// Dispatchers assign job orders to installation groups and handle
    /// ledger follow-ups, in addition to everything a technician may do.
    Dispatcher,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technician => "technician",
            Self::Dispatcher => "dispatcher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technician" => Ok(Self::Technician),
            "dispatcher" => Ok(Self::Dispatcher),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{s}'; expected 'technician' or 'dispatcher'"),
            }),
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub id: String,
    pub role: Role,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// The audit actor recorded for this operator's writes.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), String::from(self.role.as_str()))
    }
}

/// Accepts any non-empty operator id.
///
/// # Errors
///
/// Returns `AuthError::AuthenticationFailed` if `actor_id` is blank.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.trim().is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Role-based access checks for API operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Only dispatchers may assign job orders.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for technicians.
    pub fn authorize_assign_job_order(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_dispatcher(actor, "assign_job_order")
    }

    /// Only dispatchers may re-run inventory reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for technicians.
    pub fn authorize_retry_inventory_reconciliation(
        actor: &AuthenticatedActor,
    ) -> Result<(), AuthError> {
        Self::require_dispatcher(actor, "retry_inventory_reconciliation")
    }

    /// Only dispatchers may re-run the application sync.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for technicians.
    pub fn authorize_retry_application_sync(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_dispatcher(actor, "retry_application_sync")
    }

    /// Both roles may submit job-order forms.
    ///
    /// # Errors
    ///
    /// Currently never fails.
    pub const fn authorize_submit_job_order(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }

    fn require_dispatcher(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Dispatcher => Ok(()),
            Role::Technician => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from(Role::Dispatcher.as_str()),
            }),
        }
    }
}
