// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the job-order engine.
//!
//! Translates wire DTOs into domain values, checks the operator's role, runs
//! the operation through the [`fieldops::CommitOrchestrator`] and translates
//! the outcome back. Nothing here talks to a database directly.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{
    ApiError, AuthError, translate_commit_error, translate_core_error, translate_domain_error,
    translate_store_error,
};
pub use handlers::{
    assign_job_order, check_candidate, get_job_order, get_required_fields, job_order_history,
    list_barangays, list_catalog, list_cities, list_location_nodes, list_locations, list_ports,
    list_regions, retry_application_sync, retry_inventory_reconciliation, submit_job_order,
};
pub use request_response::{
    AssignJobOrderRequest, AssignJobOrderResponse, AuditEventInfo, CheckCandidateResponse,
    CommitWarningInfo, CustomerInfo, GetJobOrderResponse, ItemLineInfo, JobOrderCandidateInfo,
    JobOrderFieldsInfo, JobOrderHistoryResponse, JobOrderInfo, ListLocationNodesResponse,
    ListLookupResponse, LocationNodeInfo, LocationPathInfo, LookupEntryInfo, MediaSlotInfo,
    RequiredFieldsResponse, RetryApplicationSyncResponse, RetryInventoryReconciliationResponse,
    StepInfo, SubmitJobOrderResponse,
};
