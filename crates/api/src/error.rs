// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fieldops::{CommitError, CoreError, StoreError};
use fieldops_domain::{DomainError, FieldId};
use thiserror::Error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        action: String,
        required_role: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },
    /// The operator's role does not permit the action.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        action: String,
        required_role: String,
    },
    /// The candidate is missing required fields or carries malformed ones.
    #[error("Missing or invalid fields: {}", .fields.join(", "))]
    ValidationFailed {
        /// snake_case field identifiers.
        fields: Vec<String>,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation { rule: String, message: String },
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput { field: String, message: String },
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        resource_type: String,
        message: String,
    },
    /// A commit step against a collaborator store failed and aborted the
    /// operation.
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::ValidationFailed { missing_fields } => ApiError::ValidationFailed {
            fields: missing_fields
                .iter()
                .map(|field| String::from(field.as_str()))
                .collect(),
        },
        DomainError::InvalidPath { level } => ApiError::InvalidInput {
            field: String::from(level.as_str()),
            message: format!("Selected {level} does not belong to the selection above it"),
        },
        DomainError::InvalidHierarchy { node_id, reason } => ApiError::Internal {
            message: format!("Location hierarchy is corrupt at node {node_id}: {reason}"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_transition"),
                message: format!("Cannot move from '{from}' to '{to}': {reason}"),
            }
        }
        DomainError::InvalidStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown status '{status}'"),
        },
        DomainError::InvalidConnectionType { value } => ApiError::InvalidInput {
            field: String::from(FieldId::ConnectionType.as_str()),
            message: format!("Unknown connection type '{value}'"),
        },
        DomainError::InvalidLocationKind { value } => ApiError::InvalidInput {
            field: String::from("kind"),
            message: format!("Unknown location kind '{value}'"),
        },
        DomainError::InvalidMediaKind { value } => ApiError::InvalidInput {
            field: String::from("media"),
            message: format!("Unknown media kind '{value}'"),
        },
        DomainError::InvalidFieldId { value } => ApiError::InvalidInput {
            field: String::from("field"),
            message: format!("Unknown field '{value}'"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::ApplicationMismatch { .. } => ApiError::Internal {
            message: err.to_string(),
        },
        CoreError::ReconciliationNotApplicable { .. } => ApiError::DomainRuleViolation {
            rule: String::from("reconcile_done_only"),
            message: err.to_string(),
        },
    }
}

/// Translates a commit failure into an API error.
///
/// Warnings never reach this function; they travel on the successful
/// response.
#[must_use]
pub fn translate_commit_error(err: CommitError) -> ApiError {
    match err {
        CommitError::Rejected(core_err) => translate_core_error(core_err),
        CommitError::JobOrderNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Job order"),
            message: format!("Job order {id} does not exist"),
        },
        CommitError::ApplicationNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Application"),
            message: format!("Application {id} does not exist"),
        },
        CommitError::LoadFailed(message) => ApiError::Internal { message },
        CommitError::MediaUploadFailed { kind, reason, .. } => ApiError::StepFailed {
            step: String::from("upload_media"),
            message: format!("{kind}: {reason}"),
        },
        CommitError::JobOrderUpdateFailed { status, reason, .. } => ApiError::StepFailed {
            step: String::from("update_job_order"),
            message: format!("{reason}; status remains {status}"),
        },
        CommitError::CreateFailed(message) => ApiError::StepFailed {
            step: String::from("create_job_order"),
            message,
        },
        CommitError::AuditRecordFailed { reason, .. } => ApiError::StepFailed {
            step: String::from("record_audit_event"),
            message: reason,
        },
        CommitError::ApplicationSyncFailed {
            application_id,
            reason,
        } => ApiError::StepFailed {
            step: String::from("sync_application"),
            message: format!("application {application_id}: {reason}"),
        },
        CommitError::InventoryReconciliationFailed { stage, reason, .. } => {
            ApiError::StepFailed {
                step: String::from("reconcile_inventory"),
                message: format!("{stage}: {reason}"),
            }
        }
    }
}

/// Translates a direct lookup/store read failure.
#[must_use]
pub fn translate_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: String::from(entity),
            message: format!("{entity} {id} does not exist"),
        },
        StoreError::Rejected(message) | StoreError::Unavailable(message) => {
            ApiError::Internal { message }
        }
    }
}
