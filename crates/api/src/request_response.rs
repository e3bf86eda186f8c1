// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Enumerations travel as their snake_case names and dates as
//! `YYYY-MM-DD` strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of a lookup listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntryInfo {
    pub id: i64,
    pub display_name: String,
}

/// API response for any lookup listing. An empty list is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLookupResponse {
    /// Name of the listing (`regions`, `cities`, `plans`, ...).
    pub catalog: String,
    /// The parent the listing was narrowed to, if any.
    pub parent_id: Option<i64>,
    pub entries: Vec<LookupEntryInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNodeInfo {
    pub id: i64,
    /// `region`, `city`, `barangay` or `location`.
    pub kind: String,
    pub name: String,
    pub parent_id: Option<i64>,
}

/// API response for the whole location hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLocationNodesResponse {
    pub nodes: Vec<LocationNodeInfo>,
}

/// A location selection, one optional id per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPathInfo {
    pub region_id: Option<i64>,
    pub city_id: Option<i64>,
    pub barangay_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// Customer identity carried on an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub mobile_number: String,
    pub secondary_mobile_number: Option<String>,
    pub email: Option<String>,
    pub installation_address: String,
}

/// The editable field set of a job order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrderFieldsInfo {
    pub plan: Option<String>,
    pub promo: Option<String>,
    pub group_assignment: Option<String>,
    pub location: LocationPathInfo,
    /// `YYYY-MM-DD`.
    pub date_installed: Option<String>,
    pub usage_type: Option<String>,
    /// `antenna`, `fiber` or `local`.
    pub connection_type: Option<String>,
    pub router_model: Option<String>,
    pub modem_serial: Option<String>,
    pub ip: Option<String>,
    pub lcp_nap: Option<String>,
    pub port: Option<String>,
    pub vlan: Option<String>,
    pub visit_by: Option<String>,
    pub visit_with: Option<String>,
    pub visit_with_other: Option<String>,
    pub onsite_remarks: Option<String>,
    pub status_remarks: Option<String>,
    pub address_coordinates: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLineInfo {
    pub item_name: String,
    pub quantity: i64,
}

/// A media slot of a candidate: a reference the job order already holds,
/// or a newly captured file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum MediaSlotInfo {
    Existing {
        reference: String,
    },
    Attached {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// A job-order form as the operator submits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrderCandidateInfo {
    /// Target status: `in_progress`, `done`, `failed` or `reschedule`.
    pub status: String,
    pub fields: JobOrderFieldsInfo,
    pub customer: CustomerInfo,
    /// Keyed by media kind (`setup_image`, `port_label_image`, ...).
    #[serde(default)]
    pub media: BTreeMap<String, MediaSlotInfo>,
    #[serde(default)]
    pub items: Vec<ItemLineInfo>,
}

/// A persisted job order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrderInfo {
    pub job_order_id: i64,
    pub application_id: i64,
    pub status: String,
    pub fields: JobOrderFieldsInfo,
    /// Durable media references keyed by media kind.
    pub media: BTreeMap<String, String>,
}

/// API response for reading a job order with what its form needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetJobOrderResponse {
    pub job_order: JobOrderInfo,
    /// The application's customer identity.
    pub customer: CustomerInfo,
    /// Consumed-inventory lines currently on the ledger.
    pub items: Vec<ItemLineInfo>,
}

/// API response for an incremental check of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCandidateResponse {
    pub job_order_id: i64,
    pub submittable: bool,
    /// Missing or malformed fields, snake_case.
    pub fields: Vec<String>,
    /// The first inconsistent location level, if the path changed and broke.
    pub path_error: Option<String>,
}

/// API response listing the fields a status requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFieldsResponse {
    pub status: String,
    pub connection_type: Option<String>,
    pub fields: Vec<String>,
}

/// Outcome of one commit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// `upload_media`, `update_job_order`, `sync_application` or
    /// `reconcile_inventory`.
    pub step: String,
    /// `succeeded`, `skipped` or `failed`.
    pub status: String,
    pub detail: Option<String>,
}

/// A non-fatal failure of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitWarningInfo {
    /// `application_sync_failed` or `inventory_reconciliation_failed`.
    pub kind: String,
    /// `application` or `job_order`.
    pub record_type: String,
    /// The record that needs attention.
    pub record_id: i64,
    pub message: String,
}

/// API response for a job-order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitJobOrderResponse {
    pub job_order_id: i64,
    pub from_status: String,
    pub to_status: String,
    /// True when the submission was identical to the stored state.
    pub noop: bool,
    pub steps: Vec<StepInfo>,
    pub warnings: Vec<CommitWarningInfo>,
    pub media: BTreeMap<String, String>,
    /// Id of the stored audit event; absent for a no-op.
    pub event_id: Option<i64>,
    pub message: String,
}

/// API request to assign a job order to an installation group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignJobOrderRequest {
    pub application_id: i64,
    pub group_assignment: String,
}

/// API response for a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignJobOrderResponse {
    pub job_order: JobOrderInfo,
    pub message: String,
}

/// One entry of a job order's audit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    pub event_id: Option<i64>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub before_snapshot: String,
    pub after_snapshot: String,
}

/// API response for a job order's audit history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrderHistoryResponse {
    pub job_order_id: i64,
    pub events: Vec<AuditEventInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryInventoryReconciliationResponse {
    pub job_order_id: i64,
    pub removed: usize,
    pub inserted: usize,
    pub message: String,
}

/// API response for a re-run of the application sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryApplicationSyncResponse {
    pub job_order_id: i64,
    /// False when the application already reflected the job order.
    pub synced: bool,
    pub message: String,
}
