// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fieldops_domain::{
    Application, ApplicationId, CustomerDetails, ItemLine, JobOrder, JobOrderFields, JobOrderId,
    JobOrderStatus, LocationPath, MediaFile, MediaKind, MediaRef, MediaSet,
};
use std::fmt;

/// Everything the workflow needs to know about a job order before deciding a
/// transition: the job order itself, its application and its current
/// consumed-inventory lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOrderState {
    pub job_order: JobOrder,
    pub application: Application,
    pub items: Vec<ItemLine>,
}

/// A side effect a transition requires, in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {
    UploadMedia,
    UpdateJobOrder,
    SyncApplication,
    ReconcileInventory,
}

impl Effect {
    /// Every effect in commit order.
    pub const ORDER: [Self; 4] = [
        Self::UploadMedia,
        Self::UpdateJobOrder,
        Self::SyncApplication,
        Self::ReconcileInventory,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UploadMedia => "upload_media",
            Self::UpdateJobOrder => "update_job_order",
            Self::SyncApplication => "sync_application",
            Self::ReconcileInventory => "reconcile_inventory",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The denormalized values pushed back to the application record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationUpdate {
    pub customer: CustomerDetails,
    pub location: LocationPath,
    pub plan: Option<String>,
    pub promo: Option<String>,
}

impl ApplicationUpdate {
    /// The plan, promo and location path a job order carries, over the
    /// application's own customer details.
    #[must_use]
    pub fn from_job_order(job_order: &JobOrder, application: &Application) -> Self {
        Self {
            customer: application.customer.clone(),
            location: job_order.fields.location,
            plan: job_order.fields.plan.clone(),
            promo: job_order
                .fields
                .promo
                .clone()
                .or_else(|| application.promo.clone()),
        }
    }

    /// Applies the update to an application record.
    #[must_use]
    pub fn apply_to(&self, application: &Application) -> Application {
        Application {
            id: application.id,
            customer: self.customer.clone(),
            location: self.location,
            plan: self.plan.clone(),
            promo: self.promo.clone(),
        }
    }
}

/// The write applied to the job order in commit step 2.
///
/// The audit event travels with the update so that the store persists both
/// together or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOrderUpdate {
    pub status: JobOrderStatus,
    pub fields: JobOrderFields,
    pub media: MediaSet<MediaRef>,
    pub accepted_items: Vec<ItemLine>,
    pub audit_event: AuditEvent,
}

/// The result of a successful submission decision.
///
/// A transition is a plan: nothing has been written yet. When `effects` is
/// empty the submission was an idempotent resubmission and there is nothing
/// to commit. A resubmission of what the job order already holds whose
/// application sync or inventory reconciliation did not complete lists only
/// those steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub job_order_id: JobOrderId,
    pub application_id: ApplicationId,
    pub from: JobOrderStatus,
    pub to: JobOrderStatus,
    pub effects: Vec<Effect>,
    pub fields: JobOrderFields,
    /// References kept as they are.
    pub retained_media: MediaSet<MediaRef>,
    /// New files to upload in step 1.
    pub uploads: Vec<(MediaKind, MediaFile)>,
    pub application_update: ApplicationUpdate,
    /// Lines written by step 4, stored on the job order as its accepted lines.
    pub items: Vec<ItemLine>,
    /// `None` for an idempotent resubmission.
    pub audit_event: Option<AuditEvent>,
}

impl Transition {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }

    #[must_use]
    pub fn requires(&self, effect: Effect) -> bool {
        self.effects.contains(&effect)
    }
}

/// A job order about to be created from an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobOrder {
    pub application_id: ApplicationId,
    pub fields: JobOrderFields,
    pub actor: Actor,
    pub cause: Cause,
}

impl NewJobOrder {
    /// Builds the creation audit event once the store has assigned an id.
    #[must_use]
    pub fn audit_event(&self, job_order_id: JobOrderId) -> AuditEvent {
        let action: Action = Action::new(
            String::from("AssignJobOrder"),
            Some(format!(
                "Created job order {job_order_id} for application {} (group: {})",
                self.application_id,
                self.fields.group_assignment.as_deref().unwrap_or_default()
            )),
        );
        AuditEvent::new(
            job_order_id,
            self.actor.clone(),
            self.cause.clone(),
            action,
            StateSnapshot::new(String::from("status=none")),
            snapshot(JobOrderStatus::InProgress, &self.fields, 0, 0),
        )
    }
}

/// Renders a compact, human-readable job order snapshot for audit.
#[must_use]
pub fn snapshot(
    status: JobOrderStatus,
    fields: &JobOrderFields,
    media_count: usize,
    item_count: usize,
) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},connection_type={},plan={},group={},location={},media={media_count},items={item_count}",
        status,
        fields
            .connection_type
            .map_or("none", |connection_type| connection_type.as_str()),
        fields.plan.as_deref().unwrap_or_default(),
        fields.group_assignment.as_deref().unwrap_or_default(),
        location_label(&fields.location),
    ))
}

/// Renders the synced part of an application for audit.
#[must_use]
pub fn application_snapshot(application: &Application) -> StateSnapshot {
    StateSnapshot::new(format!(
        "application={},plan={},promo={},location={}",
        application.id,
        application.plan.as_deref().unwrap_or_default(),
        application.promo.as_deref().unwrap_or_default(),
        location_label(&application.location),
    ))
}

fn location_label(path: &LocationPath) -> String {
    path.levels()
        .iter()
        .map(|(_, id)| id.map_or_else(|| String::from("-"), |id| id.to_string()))
        .collect::<Vec<String>>()
        .join("/")
}
