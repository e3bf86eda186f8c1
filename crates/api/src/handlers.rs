// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every operation goes through a [`CommitOrchestrator`]; handlers only
//! translate between the wire DTOs and the domain types and apply the
//! operator checks.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use fieldops::{
    CandidateCheck, CommitOrchestrator, CommitReport, CommitWarning, JobOrderState,
    LookupCatalog, LookupProvider, ReconciliationSummary, StepOutcome, StepStatus,
};
use fieldops_audit::{AuditEvent, Cause};
use fieldops_domain::{
    ApplicationId, ConnectionType, CustomerDetails, DomainError, FieldId, ItemLine, JobOrder,
    JobOrderCandidate, JobOrderFields, JobOrderId, JobOrderStatus, LocationId, LocationNode,
    LocationPath, LookupEntry, MediaCapture, MediaFile, MediaKind, MediaRef, MediaSet,
    required_fields,
};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_commit_error, translate_domain_error, translate_store_error,
};
use crate::request_response::{
    AssignJobOrderRequest, AssignJobOrderResponse, AuditEventInfo, CheckCandidateResponse,
    CommitWarningInfo, CustomerInfo, GetJobOrderResponse, ItemLineInfo, JobOrderCandidateInfo,
    JobOrderFieldsInfo, JobOrderHistoryResponse, JobOrderInfo, ListLocationNodesResponse,
    ListLookupResponse, LocationNodeInfo, LocationPathInfo, LookupEntryInfo, MediaSlotInfo,
    RequiredFieldsResponse, RetryApplicationSyncResponse, RetryInventoryReconciliationResponse,
    StepInfo, SubmitJobOrderResponse,
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

// ============================================================================
// Lookups
// ============================================================================

fn lookup_response(
    catalog: &str,
    parent_id: Option<i64>,
    entries: Vec<LookupEntry>,
) -> ListLookupResponse {
    ListLookupResponse {
        catalog: String::from(catalog),
        parent_id,
        entries: entries
            .into_iter()
            .map(|entry| LookupEntryInfo {
                id: entry.id,
                display_name: entry.display_name,
            })
            .collect(),
    }
}

/// Lists every region.
///
/// # Errors
///
/// Returns an error if the lookup provider cannot be read.
pub fn list_regions(orchestrator: &CommitOrchestrator) -> Result<ListLookupResponse, ApiError> {
    let entries: Vec<LookupEntry> = orchestrator
        .stores()
        .lookups
        .list_regions()
        .map_err(translate_store_error)?;
    Ok(lookup_response("regions", None, entries))
}

/// Lists the cities of a region.
///
/// # Errors
///
/// Returns an error if the lookup provider cannot be read.
pub fn list_cities(
    orchestrator: &CommitOrchestrator,
    region_id: i64,
) -> Result<ListLookupResponse, ApiError> {
    let entries: Vec<LookupEntry> = orchestrator
        .stores()
        .lookups
        .list_cities_of(LocationId::new(region_id))
        .map_err(translate_store_error)?;
    Ok(lookup_response("cities", Some(region_id), entries))
}

/// Lists the barangays of a city.
///
/// # Errors
///
/// Returns an error if the lookup provider cannot be read.
pub fn list_barangays(
    orchestrator: &CommitOrchestrator,
    city_id: i64,
) -> Result<ListLookupResponse, ApiError> {
    let entries: Vec<LookupEntry> = orchestrator
        .stores()
        .lookups
        .list_barangays_of(LocationId::new(city_id))
        .map_err(translate_store_error)?;
    Ok(lookup_response("barangays", Some(city_id), entries))
}

/// Lists the locations of a barangay.
///
/// # Errors
///
/// Returns an error if the lookup provider cannot be read.
pub fn list_locations(
    orchestrator: &CommitOrchestrator,
    barangay_id: i64,
) -> Result<ListLookupResponse, ApiError> {
    let entries: Vec<LookupEntry> = orchestrator
        .stores()
        .lookups
        .list_locations_of(LocationId::new(barangay_id))
        .map_err(translate_store_error)?;
    Ok(lookup_response("locations", Some(barangay_id), entries))
}

/// Lists every node of the location hierarchy.
///
/// # Errors
///
/// Returns an error if the lookup provider cannot be read.
pub fn list_location_nodes(
    orchestrator: &CommitOrchestrator,
) -> Result<ListLocationNodesResponse, ApiError> {
    let nodes: Vec<LocationNode> = orchestrator
        .stores()
        .lookups
        .list_location_nodes()
        .map_err(translate_store_error)?;
    Ok(ListLocationNodesResponse {
        nodes: nodes
            .into_iter()
            .map(|node| LocationNodeInfo {
                id: node.id.value(),
                kind: String::from(node.kind.as_str()),
                name: node.name,
                parent_id: node.parent_id.map(|id| id.value()),
            })
            .collect(),
    })
}

/// Lists a flat catalog by name (`plans`, `vlans`, ...).
///
/// Ports depend on an LCP/NAP and are listed through [`list_ports`].
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for an unknown catalog or for `ports`,
/// or an error if the lookup provider cannot be read.
pub fn list_catalog(
    orchestrator: &CommitOrchestrator,
    catalog_name: &str,
) -> Result<ListLookupResponse, ApiError> {
    let catalog: LookupCatalog =
        LookupCatalog::parse(catalog_name).ok_or_else(|| ApiError::InvalidInput {
            field: String::from("catalog"),
            message: format!("Unknown catalog '{catalog_name}'"),
        })?;
    if catalog == LookupCatalog::Ports {
        return Err(ApiError::InvalidInput {
            field: String::from("catalog"),
            message: String::from("Ports are listed per LCP/NAP"),
        });
    }

    let entries: Vec<LookupEntry> = orchestrator
        .stores()
        .lookups
        .list_catalog(catalog, None)
        .map_err(translate_store_error)?;
    Ok(lookup_response(catalog.as_str(), None, entries))
}

/// Lists the ports of an LCP/NAP.
///
/// # Errors
///
/// Returns an error if the lookup provider cannot be read.
pub fn list_ports(
    orchestrator: &CommitOrchestrator,
    lcp_nap_id: i64,
) -> Result<ListLookupResponse, ApiError> {
    let entries: Vec<LookupEntry> = orchestrator
        .stores()
        .lookups
        .list_ports(lcp_nap_id)
        .map_err(translate_store_error)?;
    Ok(lookup_response(
        LookupCatalog::Ports.as_str(),
        Some(lcp_nap_id),
        entries,
    ))
}

/// Lists the fields a status requires, for form rendering.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the status or connection type is
/// unknown.
pub fn get_required_fields(
    status: &str,
    connection_type: Option<&str>,
) -> Result<RequiredFieldsResponse, ApiError> {
    let status: JobOrderStatus = JobOrderStatus::from_str(status).map_err(translate_domain_error)?;
    let connection_type: Option<ConnectionType> = connection_type
        .map(ConnectionType::from_str)
        .transpose()
        .map_err(translate_domain_error)?;

    Ok(RequiredFieldsResponse {
        status: String::from(status.as_str()),
        connection_type: connection_type.map(|c| String::from(c.as_str())),
        fields: field_names(&required_fields(status, connection_type)),
    })
}

// ============================================================================
// Job orders
// ============================================================================

/// Reads a job order with its customer and current inventory lines.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the job order does not exist.
pub fn get_job_order(
    orchestrator: &CommitOrchestrator,
    job_order_id: i64,
) -> Result<GetJobOrderResponse, ApiError> {
    let state: JobOrderState = orchestrator
        .load_state(JobOrderId::new(job_order_id))
        .map_err(translate_commit_error)?;

    Ok(GetJobOrderResponse {
        job_order: job_order_info(&state.job_order),
        customer: customer_info(&state.application.customer),
        items: state.items.iter().map(item_line_info).collect(),
    })
}

/// Creates an `InProgress` job order for an application.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a dispatcher
/// - The application does not exist
/// - The application lacks a plan, the group is blank, or the stored
///   location path is inconsistent
/// - The job order store refuses the write
pub fn assign_job_order(
    orchestrator: &CommitOrchestrator,
    request: &AssignJobOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignJobOrderResponse, ApiError> {
    AuthorizationService::authorize_assign_job_order(authenticated_actor)?;

    let job_order: JobOrder = orchestrator
        .assign(
            ApplicationId::new(request.application_id),
            &request.group_assignment,
            authenticated_actor.to_audit_actor(),
            cause,
        )
        .map_err(translate_commit_error)?;

    Ok(AssignJobOrderResponse {
        message: format!(
            "Job order {} assigned to '{}'",
            job_order.id,
            request.group_assignment.trim()
        ),
        job_order: job_order_info(&job_order),
    })
}

/// Evaluates a candidate without writing anything.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the candidate cannot be decoded, or
/// `ApiError::ResourceNotFound` if the job order does not exist.
pub fn check_candidate(
    orchestrator: &CommitOrchestrator,
    job_order_id: i64,
    candidate: JobOrderCandidateInfo,
) -> Result<CheckCandidateResponse, ApiError> {
    let candidate: JobOrderCandidate = candidate_from_info(candidate)?;
    let result: CandidateCheck = orchestrator
        .check_candidate(JobOrderId::new(job_order_id), &candidate)
        .map_err(translate_commit_error)?;

    let path_error: Option<String> = match &result.path_error {
        Some(DomainError::InvalidPath { level }) => Some(String::from(level.as_str())),
        Some(other) => Some(other.to_string()),
        None => None,
    };
    Ok(CheckCandidateResponse {
        job_order_id,
        submittable: result.is_submittable(),
        fields: field_names(&result.missing_fields),
        path_error,
    })
}

/// Submits a job-order form and commits the resulting transition.
///
/// A successful response may still carry warnings: the transition happened
/// but the application or the inventory ledger needs attention.
///
/// # Errors
///
/// Returns an error if:
/// - The candidate cannot be decoded
/// - Required fields are missing or malformed
/// - The location path is inconsistent or the status change is not allowed
/// - The job order does not exist
/// - Media upload or the job order write failed (nothing was recorded)
pub fn submit_job_order(
    orchestrator: &CommitOrchestrator,
    job_order_id: i64,
    candidate: JobOrderCandidateInfo,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<SubmitJobOrderResponse, ApiError> {
    AuthorizationService::authorize_submit_job_order(authenticated_actor)?;

    let candidate: JobOrderCandidate = candidate_from_info(candidate)?;
    let report: CommitReport = orchestrator
        .submit(
            JobOrderId::new(job_order_id),
            &candidate,
            authenticated_actor.to_audit_actor(),
            cause,
        )
        .map_err(translate_commit_error)?;

    let message: String = if report.noop {
        String::from("No changes; job order already in the submitted state")
    } else if report.warnings.is_empty() {
        format!("Job order moved from {} to {}", report.from, report.to)
    } else {
        format!(
            "Job order moved from {} to {} with {} warning(s)",
            report.from,
            report.to,
            report.warnings.len()
        )
    };
    info!(
        job_order_id,
        actor_id = %authenticated_actor.id,
        noop = report.noop,
        warnings = report.warnings.len(),
        "Submission handled"
    );

    Ok(SubmitJobOrderResponse {
        job_order_id,
        from_status: String::from(report.from.as_str()),
        to_status: String::from(report.to.as_str()),
        noop: report.noop,
        steps: report.steps.iter().map(step_info).collect(),
        warnings: report.warnings.iter().map(warning_info).collect(),
        media: media_info(&report.media),
        event_id: report.audit_event.and_then(|event| event.event_id),
        message,
    })
}

/// Lists the audit history of a job order, oldest first.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the job order does not exist.
pub fn job_order_history(
    orchestrator: &CommitOrchestrator,
    job_order_id: i64,
) -> Result<JobOrderHistoryResponse, ApiError> {
    let events: Vec<AuditEvent> = orchestrator
        .history(JobOrderId::new(job_order_id))
        .map_err(translate_commit_error)?;
    Ok(JobOrderHistoryResponse {
        job_order_id,
        events: events.iter().map(audit_event_info).collect(),
    })
}

/// Re-runs inventory reconciliation alone for a `Done` job order from the
/// lines accepted with its `Done` transition.
///
/// # Errors
///
/// Returns an error if the actor is not a dispatcher, the job order is not
/// `Done`, the retry cannot be recorded, or the ledger write fails again.
pub fn retry_inventory_reconciliation(
    orchestrator: &CommitOrchestrator,
    job_order_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RetryInventoryReconciliationResponse, ApiError> {
    AuthorizationService::authorize_retry_inventory_reconciliation(authenticated_actor)?;

    let summary: ReconciliationSummary = orchestrator
        .retry_inventory_reconciliation(
            JobOrderId::new(job_order_id),
            authenticated_actor.to_audit_actor(),
            cause,
        )
        .map_err(translate_commit_error)?;

    let message: String = if summary.removed == 0 && summary.inserted == 0 {
        String::from("Ledger already holds the accepted lines")
    } else {
        format!(
            "Replaced {} line(s) with {} accepted line(s)",
            summary.removed, summary.inserted
        )
    };
    Ok(RetryInventoryReconciliationResponse {
        job_order_id,
        removed: summary.removed,
        inserted: summary.inserted,
        message,
    })
}

/// Pushes a job order's plan, promo and location path to its application
/// again.
///
/// # Errors
///
/// Returns an error if the actor is not a dispatcher, the job order does not
/// exist, the retry cannot be recorded, or the application write fails
/// again.
pub fn retry_application_sync(
    orchestrator: &CommitOrchestrator,
    job_order_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RetryApplicationSyncResponse, ApiError> {
    AuthorizationService::authorize_retry_application_sync(authenticated_actor)?;

    let synced: bool = orchestrator
        .retry_application_sync(
            JobOrderId::new(job_order_id),
            authenticated_actor.to_audit_actor(),
            cause,
        )
        .map_err(translate_commit_error)?;

    Ok(RetryApplicationSyncResponse {
        job_order_id,
        synced,
        message: if synced {
            String::from("Application synchronized")
        } else {
            String::from("Application already in sync")
        },
    })
}

// ============================================================================
// Conversions
// ============================================================================

fn field_names(fields: &BTreeSet<FieldId>) -> Vec<String> {
    fields.iter().map(|f| String::from(f.as_str())).collect()
}

fn location_path(info: LocationPathInfo) -> LocationPath {
    LocationPath::new(
        info.region_id.map(LocationId::new),
        info.city_id.map(LocationId::new),
        info.barangay_id.map(LocationId::new),
        info.location_id.map(LocationId::new),
    )
}

fn location_path_info(path: &LocationPath) -> LocationPathInfo {
    LocationPathInfo {
        region_id: path.region.map(|id| id.value()),
        city_id: path.city.map(|id| id.value()),
        barangay_id: path.barangay.map(|id| id.value()),
        location_id: path.location.map(|id| id.value()),
    }
}

fn customer_details(info: CustomerInfo) -> CustomerDetails {
    CustomerDetails {
        first_name: info.first_name,
        middle_initial: info.middle_initial,
        last_name: info.last_name,
        mobile_number: info.mobile_number,
        secondary_mobile_number: info.secondary_mobile_number,
        email: info.email,
        installation_address: info.installation_address,
    }
}

fn customer_info(customer: &CustomerDetails) -> CustomerInfo {
    CustomerInfo {
        first_name: customer.first_name.clone(),
        middle_initial: customer.middle_initial.clone(),
        last_name: customer.last_name.clone(),
        mobile_number: customer.mobile_number.clone(),
        secondary_mobile_number: customer.secondary_mobile_number.clone(),
        email: customer.email.clone(),
        installation_address: customer.installation_address.clone(),
    }
}

fn job_order_fields(info: JobOrderFieldsInfo) -> Result<JobOrderFields, ApiError> {
    let date_installed: Option<Date> = info
        .date_installed
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            Date::parse(value, DATE_FORMAT).map_err(|e| ApiError::InvalidInput {
                field: String::from(FieldId::DateInstalled.as_str()),
                message: format!("'{value}' is not a YYYY-MM-DD date: {e}"),
            })
        })
        .transpose()?;
    let connection_type: Option<ConnectionType> = info
        .connection_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ConnectionType::from_str)
        .transpose()
        .map_err(translate_domain_error)?;

    Ok(JobOrderFields {
        plan: info.plan,
        promo: info.promo,
        group_assignment: info.group_assignment,
        location: location_path(info.location),
        date_installed,
        usage_type: info.usage_type,
        connection_type,
        router_model: info.router_model,
        modem_serial: info.modem_serial,
        ip: info.ip,
        lcp_nap: info.lcp_nap,
        port: info.port,
        vlan: info.vlan,
        visit_by: info.visit_by,
        visit_with: info.visit_with,
        visit_with_other: info.visit_with_other,
        onsite_remarks: info.onsite_remarks,
        status_remarks: info.status_remarks,
        address_coordinates: info.address_coordinates,
    })
}

fn job_order_fields_info(fields: &JobOrderFields) -> JobOrderFieldsInfo {
    JobOrderFieldsInfo {
        plan: fields.plan.clone(),
        promo: fields.promo.clone(),
        group_assignment: fields.group_assignment.clone(),
        location: location_path_info(&fields.location),
        date_installed: fields
            .date_installed
            .and_then(|date| date.format(DATE_FORMAT).ok()),
        usage_type: fields.usage_type.clone(),
        connection_type: fields.connection_type.map(|c| String::from(c.as_str())),
        router_model: fields.router_model.clone(),
        modem_serial: fields.modem_serial.clone(),
        ip: fields.ip.clone(),
        lcp_nap: fields.lcp_nap.clone(),
        port: fields.port.clone(),
        vlan: fields.vlan.clone(),
        visit_by: fields.visit_by.clone(),
        visit_with: fields.visit_with.clone(),
        visit_with_other: fields.visit_with_other.clone(),
        onsite_remarks: fields.onsite_remarks.clone(),
        status_remarks: fields.status_remarks.clone(),
        address_coordinates: fields.address_coordinates.clone(),
    }
}

fn media_info(media: &MediaSet<MediaRef>) -> BTreeMap<String, String> {
    media
        .iter()
        .map(|(kind, reference)| (String::from(kind.as_str()), String::from(reference.as_str())))
        .collect()
}

fn job_order_info(job_order: &JobOrder) -> JobOrderInfo {
    JobOrderInfo {
        job_order_id: job_order.id.value(),
        application_id: job_order.application_id.value(),
        status: String::from(job_order.status.as_str()),
        fields: job_order_fields_info(&job_order.fields),
        media: media_info(&job_order.media),
    }
}

fn item_line_info(line: &ItemLine) -> ItemLineInfo {
    ItemLineInfo {
        item_name: line.item_name.clone(),
        quantity: line.quantity,
    }
}

/// Decodes a wire candidate. Only decoding errors are reported here; rule
/// checks belong to the workflow.
fn candidate_from_info(info: JobOrderCandidateInfo) -> Result<JobOrderCandidate, ApiError> {
    let status: JobOrderStatus =
        JobOrderStatus::from_str(info.status.trim()).map_err(translate_domain_error)?;
    let fields: JobOrderFields = job_order_fields(info.fields)?;

    let mut media: MediaSet<MediaCapture> = MediaSet::new();
    for (key, slot) in info.media {
        let kind: MediaKind = MediaKind::from_str(&key).map_err(translate_domain_error)?;
        let capture: MediaCapture = match slot {
            MediaSlotInfo::Existing { reference } => MediaCapture::Existing(MediaRef::new(reference)),
            MediaSlotInfo::Attached {
                file_name,
                content_type,
                bytes,
            } => MediaCapture::Attached(MediaFile::new(file_name, content_type, bytes)),
        };
        media.insert(kind, capture);
    }
    debug!(%status, media = media.len(), items = info.items.len(), "Decoded candidate");

    Ok(JobOrderCandidate {
        status,
        fields,
        customer: customer_details(info.customer),
        media,
        items: info
            .items
            .into_iter()
            .map(|item| ItemLine::new(item.item_name, item.quantity))
            .collect(),
    })
}

fn step_info(outcome: &StepOutcome) -> StepInfo {
    let (status, detail): (&str, Option<String>) = match &outcome.status {
        StepStatus::Succeeded => ("succeeded", None),
        StepStatus::Skipped => ("skipped", None),
        StepStatus::Failed(reason) => ("failed", Some(reason.clone())),
    };
    StepInfo {
        step: String::from(outcome.step.as_str()),
        status: String::from(status),
        detail,
    }
}

fn warning_info(warning: &CommitWarning) -> CommitWarningInfo {
    match warning {
        CommitWarning::ApplicationSyncFailed { application_id, .. } => CommitWarningInfo {
            kind: String::from("application_sync_failed"),
            record_type: String::from("application"),
            record_id: application_id.value(),
            message: warning.to_string(),
        },
        CommitWarning::InventoryReconciliationFailed { job_order_id, .. } => CommitWarningInfo {
            kind: String::from("inventory_reconciliation_failed"),
            record_type: String::from("job_order"),
            record_id: job_order_id.value(),
            message: warning.to_string(),
        },
    }
}

fn audit_event_info(event: &AuditEvent) -> AuditEventInfo {
    AuditEventInfo {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
    }
}
