// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Multi-step commit of a job-order transition.
//!
//! Steps run strictly in this order, each against its own store:
//!
//! 1. media upload: failure aborts, nothing else is written
//! 2. job-order update (with its audit event): failure aborts, the prior
//!    status stands
//! 3. application sync: failure is a warning, the transition happened
//! 4. inventory reconciliation (`Done` only): failure is a warning and the
//!    step can be re-run alone
//!
//! Earlier durable steps are never rolled back. Resubmitting what the job
//! order already holds re-runs steps 3 and 4 when they did not complete;
//! both can also be retried on their own. The whole sequence runs under the
//! per-id lock of the job order.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use fieldops_audit::{Action, Actor, AuditEvent, Cause};
use fieldops_domain::{
    Application, ApplicationId, DomainError, FieldId, ItemLine, JobOrder, JobOrderCandidate,
    JobOrderId, JobOrderItem, JobOrderStatus, LocationHierarchy, LocationNode, MediaKind, MediaRef,
    MediaSet, check,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::error::CoreError;
use crate::inventory::{InventoryReconciler, ReconciliationStage, ReconciliationSummary};
use crate::locks::JobOrderLocks;
use crate::state::{
    ApplicationUpdate, Effect, JobOrderState, JobOrderUpdate, NewJobOrder, Transition,
    application_snapshot, snapshot,
};
use crate::store::{
    ApplicationStore, InventoryLedgerStore, JobOrderStore, LookupProvider, MediaStore, StoreError,
};
use crate::workflow::{self, same_lines};

/// The collaborators a commit writes to.
#[derive(Clone)]
pub struct Stores {
    pub lookups: Arc<dyn LookupProvider>,
    pub media: Arc<dyn MediaStore>,
    pub job_orders: Arc<dyn JobOrderStore>,
    pub applications: Arc<dyn ApplicationStore>,
    pub ledger: Arc<dyn InventoryLedgerStore>,
}

impl fmt::Debug for Stores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// Outcome of one commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// The transition did not require this step.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Effect,
    pub status: StepStatus,
}

impl StepOutcome {
    const fn new(step: Effect, status: StepStatus) -> Self {
        Self { step, status }
    }
}

/// A non-fatal failure attached to a committed transition. Names the record
/// that needs attention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitWarning {
    #[error("Application {application_id} was not synchronized: {reason}")]
    ApplicationSyncFailed {
        application_id: ApplicationId,
        reason: String,
    },
    #[error("Inventory reconciliation failed for job order {job_order_id}: {stage}: {reason}")]
    InventoryReconciliationFailed {
        job_order_id: JobOrderId,
        stage: ReconciliationStage,
        reason: String,
    },
}

/// A failure that stopped the commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// The submission was refused before any store was written.
    #[error(transparent)]
    Rejected(#[from] CoreError),
    #[error("Job order {0} not found")]
    JobOrderNotFound(JobOrderId),
    #[error("Application {0} not found")]
    ApplicationNotFound(ApplicationId),
    /// Reading the current state failed; nothing was written.
    #[error("Failed to load current state: {0}")]
    LoadFailed(String),
    #[error("Media upload failed for {kind}: {reason}")]
    MediaUploadFailed {
        kind: MediaKind,
        reason: String,
        steps: Vec<StepOutcome>,
    },
    #[error("Job order {job_order_id} update failed, status remains {status}: {reason}")]
    JobOrderUpdateFailed {
        job_order_id: JobOrderId,
        status: JobOrderStatus,
        reason: String,
        steps: Vec<StepOutcome>,
    },
    #[error("Job order could not be created: {0}")]
    CreateFailed(String),
    /// The history entry of a resumed or retried step could not be written;
    /// nothing else was.
    #[error("Audit event for job order {job_order_id} could not be recorded: {reason}")]
    AuditRecordFailed {
        job_order_id: JobOrderId,
        reason: String,
        steps: Vec<StepOutcome>,
    },
    /// Only returned by a stand-alone application sync retry.
    #[error("Application {application_id} was not synchronized: {reason}")]
    ApplicationSyncFailed {
        application_id: ApplicationId,
        reason: String,
    },
    /// Only returned by a stand-alone reconciliation retry.
    #[error("Inventory reconciliation failed for job order {job_order_id}: {stage}: {reason}")]
    InventoryReconciliationFailed {
        job_order_id: JobOrderId,
        stage: ReconciliationStage,
        reason: String,
    },
}

/// What a commit did, step by step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub job_order_id: JobOrderId,
    pub from: JobOrderStatus,
    pub to: JobOrderStatus,
    /// True for an idempotent resubmission; every step is skipped.
    pub noop: bool,
    /// Every step in commit order.
    pub steps: Vec<StepOutcome>,
    pub warnings: Vec<CommitWarning>,
    /// Media references now stored on the job order.
    pub media: MediaSet<MediaRef>,
    /// The stored audit event, `None` for a no-op.
    pub audit_event: Option<AuditEvent>,
}

impl CommitReport {
    #[must_use]
    pub fn outcome(&self, step: Effect) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|outcome| outcome.step == step)
            .map(|outcome| &outcome.status)
    }
}

/// Read-only evaluation of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCheck {
    pub missing_fields: BTreeSet<FieldId>,
    pub path_error: Option<DomainError>,
}

impl CandidateCheck {
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.missing_fields.is_empty() && self.path_error.is_none()
    }
}

/// Sequences the commit steps of job-order transitions.
#[derive(Debug)]
pub struct CommitOrchestrator {
    stores: Stores,
    locks: JobOrderLocks,
}

impl CommitOrchestrator {
    #[must_use]
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            locks: JobOrderLocks::new(),
        }
    }

    #[must_use]
    pub const fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Validates `candidate` against job order `job_order_id` and commits the
    /// resulting transition.
    ///
    /// # Errors
    ///
    /// Returns `CommitError::Rejected` for validation, path and transition
    /// failures (nothing written), a not-found or load error, or a fatal
    /// step-1/step-2 failure. Step-3/step-4 failures are warnings on the
    /// returned report.
    pub fn submit(
        &self,
        job_order_id: JobOrderId,
        candidate: &JobOrderCandidate,
        actor: Actor,
        cause: Cause,
    ) -> Result<CommitReport, CommitError> {
        let missing_fields: BTreeSet<FieldId> = check(candidate);
        if !missing_fields.is_empty() {
            debug!(job_order_id = %job_order_id, ?missing_fields, "Candidate rejected");
            return Err(CoreError::from(DomainError::ValidationFailed { missing_fields }).into());
        }

        self.locks
            .with_lock(job_order_id, || -> Result<CommitReport, CommitError> {
                let state: JobOrderState = self.load_state(job_order_id)?;
                let hierarchy: LocationHierarchy = self.load_hierarchy()?;
                let transition: Transition =
                    workflow::submit(&hierarchy, &state, candidate, actor, cause)?;
                self.commit(&transition)
            })
    }

    /// Runs `check` and, when the location path differs from the stored one,
    /// path validation, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the job order or hierarchy cannot be read.
    pub fn check_candidate(
        &self,
        job_order_id: JobOrderId,
        candidate: &JobOrderCandidate,
    ) -> Result<CandidateCheck, CommitError> {
        let job_order: JobOrder = self.load_job_order(job_order_id)?;
        let path_error: Option<DomainError> =
            if candidate.fields.location == job_order.fields.location {
                None
            } else {
                self.load_hierarchy()?
                    .validate_path(&candidate.fields.location)
                    .err()
            };
        Ok(CandidateCheck {
            missing_fields: check(candidate),
            path_error,
        })
    }

    /// Creates an `InProgress` job order for an application.
    ///
    /// # Errors
    ///
    /// Returns `CommitError::ApplicationNotFound`, `CommitError::Rejected`
    /// when the seeded fields are not valid, or `CommitError::CreateFailed`.
    pub fn assign(
        &self,
        application_id: ApplicationId,
        group_assignment: &str,
        actor: Actor,
        cause: Cause,
    ) -> Result<JobOrder, CommitError> {
        let application: Application = self.load_application(application_id)?;
        let hierarchy: LocationHierarchy = self.load_hierarchy()?;
        let new_job_order: NewJobOrder =
            workflow::plan_assignment(&hierarchy, &application, group_assignment, actor, cause)?;

        let job_order: JobOrder = self
            .stores
            .job_orders
            .create(&new_job_order)
            .map_err(|e| {
                error!(application_id = %application_id, error = %e, "Failed to create job order");
                CommitError::CreateFailed(e.to_string())
            })?;
        info!(
            job_order_id = %job_order.id,
            application_id = %application_id,
            "Assigned job order"
        );
        Ok(job_order)
    }

    /// Re-runs inventory reconciliation alone for a `Done` job order, from
    /// the lines accepted with its `Done` transition.
    ///
    /// The retry is recorded in the job order's history before the ledger
    /// is touched. A ledger that already holds the accepted lines is left
    /// alone and nothing is recorded.
    ///
    /// # Errors
    ///
    /// Returns `CommitError::Rejected` if the job order is not `Done`,
    /// `CommitError::AuditRecordFailed` if the history entry cannot be
    /// written, and `CommitError::InventoryReconciliationFailed` if the
    /// ledger write fails again.
    pub fn retry_inventory_reconciliation(
        &self,
        job_order_id: JobOrderId,
        actor: Actor,
        cause: Cause,
    ) -> Result<ReconciliationSummary, CommitError> {
        self.locks
            .with_lock(job_order_id, || -> Result<ReconciliationSummary, CommitError> {
                let state: JobOrderState = self.load_state(job_order_id)?;
                let job_order: &JobOrder = &state.job_order;
                if job_order.status != JobOrderStatus::Done {
                    return Err(CoreError::ReconciliationNotApplicable {
                        job_order_id,
                        status: job_order.status,
                    }
                    .into());
                }
                if same_lines(&state.items, &job_order.accepted_items) {
                    info!(job_order_id = %job_order_id, "Ledger already holds the accepted lines");
                    return Ok(ReconciliationSummary {
                        removed: 0,
                        inserted: 0,
                    });
                }

                let event: AuditEvent = AuditEvent::new(
                    job_order_id,
                    actor,
                    cause,
                    Action::new(
                        String::from("RetryInventoryReconciliation"),
                        Some(format!(
                            "{} ledger line(s) replaced by {} accepted line(s)",
                            state.items.len(),
                            job_order.accepted_items.len()
                        )),
                    ),
                    snapshot(
                        job_order.status,
                        &job_order.fields,
                        job_order.media.len(),
                        state.items.len(),
                    ),
                    snapshot(
                        job_order.status,
                        &job_order.fields,
                        job_order.media.len(),
                        job_order.accepted_items.len(),
                    ),
                );
                self.record_event(job_order_id, &event, Vec::new())?;

                let summary: ReconciliationSummary =
                    InventoryReconciler::new(self.stores.ledger.as_ref())
                        .reconcile(job_order_id, &job_order.accepted_items)
                        .map_err(|failure| CommitError::InventoryReconciliationFailed {
                            job_order_id,
                            stage: failure.stage,
                            reason: failure.source.to_string(),
                        })?;
                info!(
                    job_order_id = %job_order_id,
                    removed = summary.removed,
                    inserted = summary.inserted,
                    "Inventory reconciliation retried"
                );
                Ok(summary)
            })
    }

    /// Pushes the job order's plan, promo and location path to its
    /// application again.
    ///
    /// Returns `false` when the application already reflects them; nothing
    /// is written then. Otherwise the retry is recorded in the job order's
    /// history before the application is written.
    ///
    /// # Errors
    ///
    /// Returns a not-found or load error, `CommitError::AuditRecordFailed`
    /// if the history entry cannot be written, and
    /// `CommitError::ApplicationSyncFailed` if the application write fails
    /// again.
    pub fn retry_application_sync(
        &self,
        job_order_id: JobOrderId,
        actor: Actor,
        cause: Cause,
    ) -> Result<bool, CommitError> {
        self.locks
            .with_lock(job_order_id, || -> Result<bool, CommitError> {
                let state: JobOrderState = self.load_state(job_order_id)?;
                let update: ApplicationUpdate =
                    ApplicationUpdate::from_job_order(&state.job_order, &state.application);
                let synced: Application = update.apply_to(&state.application);
                if synced == state.application {
                    info!(
                        job_order_id = %job_order_id,
                        application_id = %state.application.id,
                        "Application already in sync"
                    );
                    return Ok(false);
                }

                let event: AuditEvent = AuditEvent::new(
                    job_order_id,
                    actor,
                    cause,
                    Action::new(
                        String::from("RetryApplicationSync"),
                        Some(format!("application {}", state.application.id)),
                    ),
                    application_snapshot(&state.application),
                    application_snapshot(&synced),
                );
                self.record_event(job_order_id, &event, Vec::new())?;

                self.stores
                    .applications
                    .update(state.application.id, &update)
                    .map_err(|e| {
                        warn!(
                            job_order_id = %job_order_id,
                            application_id = %state.application.id,
                            error = %e,
                            "Application sync retry failed"
                        );
                        CommitError::ApplicationSyncFailed {
                            application_id: state.application.id,
                            reason: e.to_string(),
                        }
                    })?;
                info!(
                    job_order_id = %job_order_id,
                    application_id = %state.application.id,
                    "Application sync retried"
                );
                Ok(true)
            })
    }

    /// Audit history of a job order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CommitError::JobOrderNotFound` or `CommitError::LoadFailed`.
    pub fn history(&self, job_order_id: JobOrderId) -> Result<Vec<AuditEvent>, CommitError> {
        self.load_job_order(job_order_id)?;
        self.stores
            .job_orders
            .history(job_order_id)
            .map_err(|e| CommitError::LoadFailed(e.to_string()))
    }

    /// Current state of a job order as the workflow sees it.
    ///
    /// # Errors
    ///
    /// Returns a not-found error or `CommitError::LoadFailed`.
    pub fn load_state(&self, job_order_id: JobOrderId) -> Result<JobOrderState, CommitError> {
        let job_order: JobOrder = self.load_job_order(job_order_id)?;
        let application: Application = self.load_application(job_order.application_id)?;
        let items: Vec<ItemLine> = self
            .stores
            .ledger
            .list_items_of(job_order_id)
            .map_err(|e| CommitError::LoadFailed(e.to_string()))?
            .iter()
            .map(JobOrderItem::to_line)
            .collect();
        Ok(JobOrderState {
            job_order,
            application,
            items,
        })
    }

    fn record_event(
        &self,
        job_order_id: JobOrderId,
        event: &AuditEvent,
        steps: Vec<StepOutcome>,
    ) -> Result<AuditEvent, CommitError> {
        self.stores.job_orders.record_event(event).map_err(|e| {
            error!(job_order_id = %job_order_id, error = %e, "Failed to record audit event");
            CommitError::AuditRecordFailed {
                job_order_id,
                reason: e.to_string(),
                steps,
            }
        })
    }

    fn load_job_order(&self, job_order_id: JobOrderId) -> Result<JobOrder, CommitError> {
        self.stores.job_orders.get(job_order_id).map_err(|e| match e {
            StoreError::NotFound { .. } => CommitError::JobOrderNotFound(job_order_id),
            other => CommitError::LoadFailed(other.to_string()),
        })
    }

    fn load_application(&self, application_id: ApplicationId) -> Result<Application, CommitError> {
        self.stores
            .applications
            .get(application_id)
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CommitError::ApplicationNotFound(application_id),
                other => CommitError::LoadFailed(other.to_string()),
            })
    }

    fn load_hierarchy(&self) -> Result<LocationHierarchy, CommitError> {
        let nodes: Vec<LocationNode> = self
            .stores
            .lookups
            .list_location_nodes()
            .map_err(|e| CommitError::LoadFailed(e.to_string()))?;
        LocationHierarchy::from_nodes(nodes).map_err(|e| CommitError::LoadFailed(e.to_string()))
    }

    /// Executes the effects of `transition`. Must be called under the lock
    /// of its job order.
    fn commit(&self, transition: &Transition) -> Result<CommitReport, CommitError> {
        let job_order_id: JobOrderId = transition.job_order_id;

        let Some(audit_event) = transition.audit_event.as_ref().filter(|_| !transition.is_noop())
        else {
            info!(job_order_id = %job_order_id, status = %transition.to, "Identical resubmission, nothing to commit");
            return Ok(CommitReport {
                job_order_id,
                from: transition.from,
                to: transition.to,
                noop: true,
                steps: Effect::ORDER
                    .iter()
                    .map(|step| StepOutcome::new(*step, StepStatus::Skipped))
                    .collect(),
                warnings: Vec::new(),
                media: transition.retained_media.clone(),
                audit_event: None,
            });
        };

        let mut steps: Vec<StepOutcome> = Vec::with_capacity(Effect::ORDER.len());
        let mut warnings: Vec<CommitWarning> = Vec::new();

        // Step 1
        let mut media: MediaSet<MediaRef> = transition.retained_media.clone();
        if transition.requires(Effect::UploadMedia) {
            for (kind, file) in &transition.uploads {
                match self.stores.media.upload(*kind, file) {
                    Ok(reference) => {
                        debug!(job_order_id = %job_order_id, %kind, %reference, "Uploaded media");
                        media.insert(*kind, reference);
                    }
                    Err(e) => {
                        error!(job_order_id = %job_order_id, %kind, error = %e, "Media upload failed");
                        steps.push(StepOutcome::new(
                            Effect::UploadMedia,
                            StepStatus::Failed(e.to_string()),
                        ));
                        return Err(CommitError::MediaUploadFailed {
                            kind: *kind,
                            reason: e.to_string(),
                            steps,
                        });
                    }
                }
            }
            steps.push(StepOutcome::new(Effect::UploadMedia, StepStatus::Succeeded));
        } else {
            steps.push(StepOutcome::new(Effect::UploadMedia, StepStatus::Skipped));
        }

        // Step 2
        let stored_event: AuditEvent = if transition.requires(Effect::UpdateJobOrder) {
            let update: JobOrderUpdate = JobOrderUpdate {
                status: transition.to,
                fields: transition.fields.clone(),
                media: media.clone(),
                accepted_items: transition.items.clone(),
                audit_event: audit_event.clone(),
            };
            match self.stores.job_orders.update(job_order_id, &update) {
                Ok(event) => {
                    steps.push(StepOutcome::new(Effect::UpdateJobOrder, StepStatus::Succeeded));
                    info!(
                        job_order_id = %job_order_id,
                        from = %transition.from,
                        to = %transition.to,
                        "Job order transitioned"
                    );
                    event
                }
                Err(e) => {
                    error!(job_order_id = %job_order_id, error = %e, "Job order update failed");
                    steps.push(StepOutcome::new(
                        Effect::UpdateJobOrder,
                        StepStatus::Failed(e.to_string()),
                    ));
                    return Err(CommitError::JobOrderUpdateFailed {
                        job_order_id,
                        status: transition.from,
                        reason: e.to_string(),
                        steps,
                    });
                }
            }
        } else {
            steps.push(StepOutcome::new(Effect::UpdateJobOrder, StepStatus::Skipped));
            let event: AuditEvent = self.record_event(job_order_id, audit_event, steps.clone())?;
            info!(
                job_order_id = %job_order_id,
                status = %transition.to,
                effects = ?transition.effects,
                "Resuming outstanding commit steps"
            );
            event
        };

        // Step 3
        if transition.requires(Effect::SyncApplication) {
            match self
                .stores
                .applications
                .update(transition.application_id, &transition.application_update)
            {
                Ok(()) => {
                    steps.push(StepOutcome::new(Effect::SyncApplication, StepStatus::Succeeded));
                }
                Err(e) => {
                    warn!(
                        job_order_id = %job_order_id,
                        application_id = %transition.application_id,
                        error = %e,
                        "Application sync failed"
                    );
                    steps.push(StepOutcome::new(
                        Effect::SyncApplication,
                        StepStatus::Failed(e.to_string()),
                    ));
                    warnings.push(CommitWarning::ApplicationSyncFailed {
                        application_id: transition.application_id,
                        reason: e.to_string(),
                    });
                }
            }
        } else {
            steps.push(StepOutcome::new(Effect::SyncApplication, StepStatus::Skipped));
        }

        // Step 4
        if transition.requires(Effect::ReconcileInventory) {
            match InventoryReconciler::new(self.stores.ledger.as_ref())
                .reconcile(job_order_id, &transition.items)
            {
                Ok(_) => steps.push(StepOutcome::new(
                    Effect::ReconcileInventory,
                    StepStatus::Succeeded,
                )),
                Err(failure) => {
                    steps.push(StepOutcome::new(
                        Effect::ReconcileInventory,
                        StepStatus::Failed(format!("{}: {}", failure.stage, failure.source)),
                    ));
                    warnings.push(CommitWarning::InventoryReconciliationFailed {
                        job_order_id,
                        stage: failure.stage,
                        reason: failure.source.to_string(),
                    });
                }
            }
        } else {
            steps.push(StepOutcome::new(Effect::ReconcileInventory, StepStatus::Skipped));
        }

        Ok(CommitReport {
            job_order_id,
            from: transition.from,
            to: transition.to,
            noop: false,
            steps,
            warnings,
            media,
            audit_event: Some(stored_event),
        })
    }
}
