// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_domain::{JobOrderId, JobOrderItem, LocationPath};

use crate::{
    ApiError, AssignJobOrderRequest, AssignJobOrderResponse, CheckCandidateResponse,
    GetJobOrderResponse, JobOrderCandidateInfo, JobOrderHistoryResponse,
    JobOrderInfo, MediaSlotInfo, RetryApplicationSyncResponse,
    RetryInventoryReconciliationResponse, SubmitJobOrderResponse, assign_job_order,
    check_candidate, get_job_order, job_order_history, retry_application_sync,
    retry_inventory_reconciliation, submit_job_order,
};

use super::helpers::{
    C2, TestApi, create_test_api, create_test_cause, create_test_dispatcher,
    create_test_technician, done_candidate, path_two_info, unchanged_candidate,
};

fn assign(api: &TestApi) -> JobOrderInfo {
    let request: AssignJobOrderRequest = AssignJobOrderRequest {
        application_id: api.application_id.value(),
        group_assignment: String::from("  Team North "),
    };
    assign_job_order(
        &api.orchestrator,
        &request,
        &create_test_dispatcher(),
        create_test_cause(),
    )
    .unwrap()
    .job_order
}

fn submit(
    api: &TestApi,
    job_order_id: i64,
    candidate: JobOrderCandidateInfo,
) -> Result<SubmitJobOrderResponse, ApiError> {
    submit_job_order(
        &api.orchestrator,
        job_order_id,
        candidate,
        &create_test_technician(),
        create_test_cause(),
    )
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn test_dispatcher_assigns_job_order() {
    let api: TestApi = create_test_api();
    let request: AssignJobOrderRequest = AssignJobOrderRequest {
        application_id: api.application_id.value(),
        group_assignment: String::from("  Team North "),
    };

    let response: AssignJobOrderResponse = assign_job_order(
        &api.orchestrator,
        &request,
        &create_test_dispatcher(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.job_order.status, "in_progress");
    assert_eq!(response.job_order.application_id, api.application_id.value());
    assert_eq!(
        response.job_order.fields.group_assignment.as_deref(),
        Some("Team North")
    );
    assert_eq!(response.job_order.fields.plan.as_deref(), Some("Fiber 50"));
}

#[test]
fn test_technician_cannot_assign() {
    let api: TestApi = create_test_api();
    let request: AssignJobOrderRequest = AssignJobOrderRequest {
        application_id: api.application_id.value(),
        group_assignment: String::from("Team North"),
    };

    let result: Result<AssignJobOrderResponse, ApiError> = assign_job_order(
        &api.orchestrator,
        &request,
        &create_test_technician(),
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_assign_unknown_application_is_not_found() {
    let api: TestApi = create_test_api();
    let request: AssignJobOrderRequest = AssignJobOrderRequest {
        application_id: 999,
        group_assignment: String::from("Team North"),
    };

    let result: Result<AssignJobOrderResponse, ApiError> = assign_job_order(
        &api.orchestrator,
        &request,
        &create_test_dispatcher(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Application"
    ));
}

// ============================================================================
// Submission
// ============================================================================

#[test]
fn test_done_submission_runs_every_step() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);

    let response: SubmitJobOrderResponse =
        submit(&api, job_order.job_order_id, done_candidate(&job_order)).unwrap();

    assert!(!response.noop);
    assert_eq!(response.from_status, "in_progress");
    assert_eq!(response.to_status, "done");
    let steps: Vec<(&str, &str)> = response
        .steps
        .iter()
        .map(|s| (s.step.as_str(), s.status.as_str()))
        .collect();
    assert_eq!(
        steps,
        vec![
            ("upload_media", "succeeded"),
            ("update_job_order", "succeeded"),
            ("sync_application", "succeeded"),
            ("reconcile_inventory", "succeeded"),
        ]
    );
    assert!(response.warnings.is_empty());
    assert_eq!(response.media.len(), 8);
    assert!(response.event_id.is_some());
}

#[test]
fn test_read_back_after_done() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    submit(&api, job_order.job_order_id, done_candidate(&job_order)).unwrap();

    let response: GetJobOrderResponse =
        get_job_order(&api.orchestrator, job_order.job_order_id).unwrap();

    assert_eq!(response.job_order.status, "done");
    assert_eq!(
        response.job_order.fields.date_installed.as_deref(),
        Some("2026-03-14")
    );
    assert_eq!(
        response.job_order.fields.connection_type.as_deref(),
        Some("antenna")
    );
    assert_eq!(response.items.len(), 2);
    assert_eq!(response.customer.last_name, "Santos");
}

#[test]
fn test_identical_resubmission_is_noop() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let first: SubmitJobOrderResponse =
        submit(&api, job_order.job_order_id, done_candidate(&job_order)).unwrap();

    let stored: GetJobOrderResponse =
        get_job_order(&api.orchestrator, job_order.job_order_id).unwrap();
    let mut again: JobOrderCandidateInfo = unchanged_candidate(&stored.job_order);
    again.items = stored.items;
    let second: SubmitJobOrderResponse = submit(&api, job_order.job_order_id, again).unwrap();

    assert!(second.noop);
    assert_eq!(second.event_id, None);
    assert!(second.steps.iter().all(|s| s.status == "skipped"));
    assert_eq!(second.media, first.media);

    let history: JobOrderHistoryResponse =
        job_order_history(&api.orchestrator, job_order.job_order_id).unwrap();
    assert_eq!(history.events.len(), 2);
}

#[test]
fn test_missing_captures_are_reported_by_name() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let mut candidate: JobOrderCandidateInfo = done_candidate(&job_order);
    candidate.media.remove("setup_image");
    candidate.media.remove("port_label_image");

    let result: Result<SubmitJobOrderResponse, ApiError> =
        submit(&api, job_order.job_order_id, candidate);

    assert_eq!(
        result.unwrap_err(),
        ApiError::ValidationFailed {
            fields: vec![
                String::from("setup_image"),
                String::from("port_label_image"),
            ],
        }
    );
}

#[test]
fn test_malformed_date_is_invalid_input() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let mut candidate: JobOrderCandidateInfo = done_candidate(&job_order);
    candidate.fields.date_installed = Some(String::from("14/03/2026"));

    let result: Result<SubmitJobOrderResponse, ApiError> =
        submit(&api, job_order.job_order_id, candidate);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "date_installed"
    ));
}

#[test]
fn test_unknown_media_kind_is_invalid_input() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let mut candidate: JobOrderCandidateInfo = done_candidate(&job_order);
    candidate.media.insert(
        String::from("selfie"),
        MediaSlotInfo::Existing {
            reference: String::from("x"),
        },
    );

    let result: Result<SubmitJobOrderResponse, ApiError> =
        submit(&api, job_order.job_order_id, candidate);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "media"
    ));
}

#[test]
fn test_rejected_upload_is_a_step_failure() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let mut candidate: JobOrderCandidateInfo = done_candidate(&job_order);
    candidate.media.insert(
        String::from("speed_test_image"),
        MediaSlotInfo::Attached {
            file_name: String::from("speed.gif"),
            content_type: String::from("image/gif"),
            bytes: vec![1, 2, 3],
        },
    );

    let result: Result<SubmitJobOrderResponse, ApiError> =
        submit(&api, job_order.job_order_id, candidate);

    assert!(matches!(
        result,
        Err(ApiError::StepFailed { step, .. }) if step == "upload_media"
    ));
    let stored: GetJobOrderResponse =
        get_job_order(&api.orchestrator, job_order.job_order_id).unwrap();
    assert_eq!(stored.job_order.status, "in_progress");
}

#[test]
fn test_submit_to_unknown_job_order_is_not_found() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);

    let result: Result<SubmitJobOrderResponse, ApiError> =
        submit(&api, job_order.job_order_id + 100, done_candidate(&job_order));

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Job order"
    ));
}

#[test]
fn test_relocation_is_synchronized_to_application() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let mut candidate: JobOrderCandidateInfo = unchanged_candidate(&job_order);
    candidate.fields.location = path_two_info();

    let response: SubmitJobOrderResponse =
        submit(&api, job_order.job_order_id, candidate).unwrap();

    assert_eq!(response.to_status, "in_progress");
    let application_location: LocationPath = api
        .persistence
        .with(|p| p.get_application(api.application_id))
        .unwrap()
        .location;
    assert_eq!(application_location.city.map(|id| id.value()), Some(C2));
}

// ============================================================================
// Incremental checking
// ============================================================================

#[test]
fn test_check_reports_broken_path_without_writing() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let mut candidate: JobOrderCandidateInfo = unchanged_candidate(&job_order);
    candidate.fields.location.city_id = Some(C2);

    let response: CheckCandidateResponse =
        check_candidate(&api.orchestrator, job_order.job_order_id, candidate).unwrap();

    assert!(!response.submittable);
    assert!(response.fields.is_empty());
    assert_eq!(response.path_error.as_deref(), Some("city"));
    let history: JobOrderHistoryResponse =
        job_order_history(&api.orchestrator, job_order.job_order_id).unwrap();
    assert_eq!(history.events.len(), 1);
}

#[test]
fn test_check_lists_missing_done_fields() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    let mut candidate: JobOrderCandidateInfo = unchanged_candidate(&job_order);
    candidate.status = String::from("done");

    let response: CheckCandidateResponse =
        check_candidate(&api.orchestrator, job_order.job_order_id, candidate).unwrap();

    assert!(!response.submittable);
    assert!(response.fields.iter().any(|f| f == "date_installed"));
    assert!(response.fields.iter().any(|f| f == "items"));
    assert_eq!(response.path_error, None);
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_history_records_actor_and_cause() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    submit(&api, job_order.job_order_id, done_candidate(&job_order)).unwrap();

    let history: JobOrderHistoryResponse =
        job_order_history(&api.orchestrator, job_order.job_order_id).unwrap();

    let actions: Vec<&str> = history
        .events
        .iter()
        .map(|e| e.action_name.as_str())
        .collect();
    assert_eq!(actions, vec!["AssignJobOrder", "SubmitJobOrder"]);
    assert_eq!(history.events[0].actor_type, "dispatcher");
    assert_eq!(history.events[1].actor_id, "tech-42");
    assert_eq!(history.events[1].cause_id, "api-req-456");
}

// ============================================================================
// Inventory reconciliation retry
// ============================================================================

#[test]
fn test_retry_restores_accepted_lines_of_done_job_order() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);
    submit(&api, job_order.job_order_id, done_candidate(&job_order)).unwrap();
    let id: JobOrderId = JobOrderId::new(job_order.job_order_id);
    api.persistence
        .with(|p| {
            p.insert_items(&[JobOrderItem {
                job_order_id: id,
                item_name: String::from("Router"),
                quantity: 99,
            }])
        })
        .unwrap();

    let response: RetryInventoryReconciliationResponse = retry_inventory_reconciliation(
        &api.orchestrator,
        job_order.job_order_id,
        &create_test_dispatcher(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.removed, 3);
    assert_eq!(response.inserted, 2);
    let items: Vec<JobOrderItem> = api.persistence.with(|p| p.list_items_of(id)).unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.item_name != "Router"));
    let history: JobOrderHistoryResponse =
        job_order_history(&api.orchestrator, job_order.job_order_id).unwrap();
    let last = history.events.last().unwrap();
    assert_eq!(last.action_name, "RetryInventoryReconciliation");
    assert_eq!(last.actor_type, "dispatcher");
}

#[test]
fn test_retry_requires_done_job_order() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);

    let result: Result<RetryInventoryReconciliationResponse, ApiError> =
        retry_inventory_reconciliation(
            &api.orchestrator,
            job_order.job_order_id,
            &create_test_dispatcher(),
            create_test_cause(),
        );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "reconcile_done_only"
    ));
}

#[test]
fn test_technician_cannot_retry() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);

    let result: Result<RetryInventoryReconciliationResponse, ApiError> =
        retry_inventory_reconciliation(
            &api.orchestrator,
            job_order.job_order_id,
            &create_test_technician(),
            create_test_cause(),
        );
    let sync: Result<RetryApplicationSyncResponse, ApiError> = retry_application_sync(
        &api.orchestrator,
        job_order.job_order_id,
        &create_test_technician(),
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(sync, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_retry_application_sync_on_synced_application_writes_nothing() {
    let api: TestApi = create_test_api();
    let job_order: JobOrderInfo = assign(&api);

    let response: RetryApplicationSyncResponse = retry_application_sync(
        &api.orchestrator,
        job_order.job_order_id,
        &create_test_dispatcher(),
        create_test_cause(),
    )
    .unwrap();

    assert!(!response.synced);
    let history: JobOrderHistoryResponse =
        job_order_history(&api.orchestrator, job_order.job_order_id).unwrap();
    assert_eq!(history.events.len(), 1);
}
