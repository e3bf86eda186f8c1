// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use fieldops::{CommitError, CoreError, ReconciliationStage, StoreError};
use fieldops_domain::{
    ApplicationId, DomainError, FieldId, JobOrderId, JobOrderStatus, LocationKind, MediaKind,
};

use crate::{
    ApiError, AuthError, translate_commit_error, translate_core_error, translate_domain_error,
    translate_store_error,
};

#[test]
fn test_validation_failure_lists_snake_case_fields() {
    let missing_fields: BTreeSet<FieldId> =
        BTreeSet::from([FieldId::GroupAssignment, FieldId::Ip]);

    let err: ApiError = translate_domain_error(DomainError::ValidationFailed { missing_fields });

    assert_eq!(
        err,
        ApiError::ValidationFailed {
            fields: vec![String::from("group_assignment"), String::from("ip")],
        }
    );
    assert_eq!(
        err.to_string(),
        "Missing or invalid fields: group_assignment, ip"
    );
}

#[test]
fn test_invalid_path_names_the_level() {
    let err: ApiError = translate_domain_error(DomainError::InvalidPath {
        level: LocationKind::Barangay,
    });

    assert!(matches!(err, ApiError::InvalidInput { field, .. } if field == "barangay"));
}

#[test]
fn test_invalid_transition_is_rule_violation() {
    let err: ApiError = translate_core_error(CoreError::DomainViolation(
        DomainError::InvalidStatusTransition {
            from: String::from("done"),
            to: String::from("failed"),
            reason: String::from("done is terminal"),
        },
    ));

    assert!(matches!(err, ApiError::DomainRuleViolation { rule, .. } if rule == "status_transition"));
}

#[test]
fn test_fatal_steps_become_step_failures() {
    let upload: ApiError = translate_commit_error(CommitError::MediaUploadFailed {
        kind: MediaKind::HouseFrontImage,
        reason: String::from("Rejected: too large"),
        steps: Vec::new(),
    });
    let update: ApiError = translate_commit_error(CommitError::JobOrderUpdateFailed {
        job_order_id: JobOrderId::new(3),
        status: JobOrderStatus::InProgress,
        reason: String::from("Store unavailable: locked"),
        steps: Vec::new(),
    });

    assert_eq!(
        upload,
        ApiError::StepFailed {
            step: String::from("upload_media"),
            message: String::from("house_front_image: Rejected: too large"),
        }
    );
    assert_eq!(
        update,
        ApiError::StepFailed {
            step: String::from("update_job_order"),
            message: String::from("Store unavailable: locked; status remains in_progress"),
        }
    );
}

#[test]
fn test_retry_failure_names_the_stage() {
    let err: ApiError = translate_commit_error(CommitError::InventoryReconciliationFailed {
        job_order_id: JobOrderId::new(3),
        stage: ReconciliationStage::ItemsClearedReinsertionFailed,
        reason: String::from("Store unavailable: disk full"),
    });

    assert!(matches!(
        err,
        ApiError::StepFailed { step, message }
            if step == "reconcile_inventory" && message.starts_with("items cleared, reinsertion failed")
    ));
}

#[test]
fn test_standalone_retry_failures_name_their_step() {
    let audit: ApiError = translate_commit_error(CommitError::AuditRecordFailed {
        job_order_id: JobOrderId::new(3),
        reason: String::from("Store unavailable: locked"),
        steps: Vec::new(),
    });
    let sync: ApiError = translate_commit_error(CommitError::ApplicationSyncFailed {
        application_id: ApplicationId::new(9),
        reason: String::from("Store unavailable: locked"),
    });

    assert_eq!(
        audit,
        ApiError::StepFailed {
            step: String::from("record_audit_event"),
            message: String::from("Store unavailable: locked"),
        }
    );
    assert_eq!(
        sync,
        ApiError::StepFailed {
            step: String::from("sync_application"),
            message: String::from("application 9: Store unavailable: locked"),
        }
    );
}

#[test]
fn test_store_not_found_keeps_entity() {
    let err: ApiError = translate_store_error(StoreError::NotFound {
        entity: "Job order",
        id: 12,
    });

    assert_eq!(
        err,
        ApiError::ResourceNotFound {
            resource_type: String::from("Job order"),
            message: String::from("Job order 12 does not exist"),
        }
    );
}

#[test]
fn test_auth_error_converts_to_api_error() {
    let err: ApiError = ApiError::from(AuthError::Unauthorized {
        action: String::from("assign_job_order"),
        required_role: String::from("dispatcher"),
    });

    assert_eq!(
        err.to_string(),
        "Unauthorized: 'assign_job_order' requires dispatcher role"
    );
}
