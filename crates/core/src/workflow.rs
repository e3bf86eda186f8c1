// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use fieldops_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fieldops_domain::{
    Application, DomainError, FieldId, ItemLine, JobOrder, JobOrderCandidate, JobOrderFields,
    JobOrderStatus, LocationHierarchy, MediaCapture, MediaFile, MediaKind, MediaRef, MediaSet,
    check,
};

use crate::error::CoreError;
use crate::state::{ApplicationUpdate, Effect, JobOrderState, NewJobOrder, Transition, snapshot};

/// Decides whether `candidate` may be applied to the job order in `state`.
///
/// Nothing is written: the returned [`Transition`] lists the effects the
/// commit has to carry out. Checks run in this order:
///
/// 1. the candidate must pass [`check`] for its target status
/// 2. a changed location path must be consistent with `hierarchy`
/// 3. a resubmission of what the job order already holds only re-runs the
///    application sync or inventory reconciliation that did not complete,
///    and is a no-op when both are current
/// 4. the status change must be allowed by the lifecycle
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` with `ValidationFailed`,
/// `InvalidPath` or `InvalidStatusTransition`, or
/// `CoreError::ApplicationMismatch` if `state` is inconsistent.
pub fn submit(
    hierarchy: &LocationHierarchy,
    state: &JobOrderState,
    candidate: &JobOrderCandidate,
    actor: Actor,
    cause: Cause,
) -> Result<Transition, CoreError> {
    let job_order: &JobOrder = &state.job_order;
    if state.application.id != job_order.application_id {
        return Err(CoreError::ApplicationMismatch {
            job_order_id: job_order.id,
            expected: job_order.application_id,
            actual: state.application.id,
        });
    }

    let missing_fields: BTreeSet<FieldId> = check(candidate);
    if !missing_fields.is_empty() {
        return Err(DomainError::ValidationFailed { missing_fields }.into());
    }

    if candidate.fields.location != job_order.fields.location {
        hierarchy.validate_path(&candidate.fields.location)?;
    }

    let from: JobOrderStatus = job_order.status;
    let to: JobOrderStatus = candidate.status;

    if holds_candidate(job_order, candidate) {
        return Ok(resume(state, candidate, actor, cause));
    }

    from.validate_transition(to)?;

    let (retained_media, uploads): (MediaSet<MediaRef>, Vec<(MediaKind, MediaFile)>) =
        if to == JobOrderStatus::Done {
            split_media(&candidate.media)
        } else {
            (job_order.media.clone(), Vec::new())
        };

    let mut effects: Vec<Effect> = Vec::with_capacity(Effect::ORDER.len());
    if !uploads.is_empty() {
        effects.push(Effect::UploadMedia);
    }
    effects.push(Effect::UpdateJobOrder);
    effects.push(Effect::SyncApplication);
    if to == JobOrderStatus::Done {
        effects.push(Effect::ReconcileInventory);
    }

    let items: Vec<ItemLine> = if to == JobOrderStatus::Done {
        candidate.items.clone()
    } else {
        job_order.accepted_items.clone()
    };

    let before: StateSnapshot = snapshot(
        from,
        &job_order.fields,
        job_order.media.len(),
        state.items.len(),
    );
    let after: StateSnapshot = snapshot(
        to,
        &candidate.fields,
        retained_media.len() + uploads.len(),
        items.len(),
    );
    let action: Action = Action::new(
        String::from("SubmitJobOrder"),
        Some(format!("{from} -> {to}")),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(job_order.id, actor, cause, action, before, after);

    Ok(Transition {
        job_order_id: job_order.id,
        application_id: job_order.application_id,
        from,
        to,
        effects,
        fields: candidate.fields.clone(),
        retained_media,
        uploads,
        application_update: application_update(&state.application, candidate),
        items,
        audit_event: Some(audit_event),
    })
}

/// Plans the creation of an `InProgress` job order from an application.
///
/// The job order starts from the application's plan, promo and location
/// path; the location path must be complete and consistent.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if the seeded fields do not satisfy
/// the `InProgress` rules or the location path is inconsistent.
pub fn plan_assignment(
    hierarchy: &LocationHierarchy,
    application: &Application,
    group_assignment: &str,
    actor: Actor,
    cause: Cause,
) -> Result<NewJobOrder, CoreError> {
    let fields: JobOrderFields = JobOrderFields {
        plan: application.plan.clone(),
        promo: application.promo.clone(),
        group_assignment: Some(group_assignment.trim().to_string()),
        location: application.location,
        ..JobOrderFields::default()
    };

    let candidate: JobOrderCandidate = JobOrderCandidate {
        status: JobOrderStatus::InProgress,
        fields,
        customer: application.customer.clone(),
        media: MediaSet::new(),
        items: Vec::new(),
    };

    let missing_fields: BTreeSet<FieldId> = check(&candidate);
    if !missing_fields.is_empty() {
        return Err(DomainError::ValidationFailed { missing_fields }.into());
    }
    hierarchy.validate_path(&candidate.fields.location)?;

    Ok(NewJobOrder {
        application_id: application.id,
        fields: candidate.fields,
        actor,
        cause,
    })
}

fn application_update(application: &Application, candidate: &JobOrderCandidate) -> ApplicationUpdate {
    ApplicationUpdate {
        customer: candidate.customer.clone(),
        location: candidate.fields.location,
        plan: candidate.fields.plan.clone(),
        promo: candidate
            .fields
            .promo
            .clone()
            .or_else(|| application.promo.clone()),
    }
}

fn split_media(
    media: &MediaSet<MediaCapture>,
) -> (MediaSet<MediaRef>, Vec<(MediaKind, MediaFile)>) {
    let mut retained: MediaSet<MediaRef> = MediaSet::new();
    let mut uploads: Vec<(MediaKind, MediaFile)> = Vec::new();
    for (kind, capture) in media.iter() {
        match capture {
            MediaCapture::Existing(reference) => {
                retained.insert(kind, reference.clone());
            }
            MediaCapture::Attached(file) => uploads.push((kind, file.clone())),
        }
    }
    (retained, uploads)
}

/// Plans what a resubmission of the stored job order still has to do.
///
/// The application is synced again when it does not reflect the candidate,
/// and a `Done` ledger that differs from the accepted lines is reconciled
/// again. The job order itself is not rewritten.
fn resume(
    state: &JobOrderState,
    candidate: &JobOrderCandidate,
    actor: Actor,
    cause: Cause,
) -> Transition {
    let job_order: &JobOrder = &state.job_order;
    let update: ApplicationUpdate = application_update(&state.application, candidate);

    let mut effects: Vec<Effect> = Vec::new();
    if update.apply_to(&state.application) != state.application {
        effects.push(Effect::SyncApplication);
    }
    if job_order.status == JobOrderStatus::Done
        && !same_lines(&state.items, &job_order.accepted_items)
    {
        effects.push(Effect::ReconcileInventory);
    }

    let audit_event: Option<AuditEvent> = (!effects.is_empty()).then(|| {
        let steps: Vec<&str> = effects.iter().map(Effect::as_str).collect();
        AuditEvent::new(
            job_order.id,
            actor,
            cause,
            Action::new(String::from("ResumeJobOrderCommit"), Some(steps.join(", "))),
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
        )
    });

    Transition {
        job_order_id: job_order.id,
        application_id: job_order.application_id,
        from: job_order.status,
        to: job_order.status,
        effects,
        fields: job_order.fields.clone(),
        retained_media: job_order.media.clone(),
        uploads: Vec::new(),
        application_update: update,
        items: job_order.accepted_items.clone(),
        audit_event,
    }
}

/// True when the job order already holds the status, fields, media and
/// accepted lines the candidate asks for.
///
/// Lines and media are only written for `Done`, so only then do they take
/// part in the comparison. Existing media references must equal the stored
/// ones, and an attachment for a slot that already holds a reference is
/// treated as a retransmission of the accepted capture.
fn holds_candidate(job_order: &JobOrder, candidate: &JobOrderCandidate) -> bool {
    if job_order.status != candidate.status || job_order.fields != candidate.fields {
        return false;
    }

    if candidate.status != JobOrderStatus::Done {
        return true;
    }

    if !same_lines(&job_order.accepted_items, &candidate.items) {
        return false;
    }

    let same_kinds: bool = candidate.media.len() == job_order.media.len()
        && candidate
            .media
            .iter()
            .all(|(kind, _)| job_order.media.contains(kind));
    same_kinds
        && candidate.media.iter().all(|(kind, capture)| match capture {
            MediaCapture::Existing(reference) => job_order.media.get(kind) == Some(reference),
            MediaCapture::Attached(_) => true,
        })
}

pub(crate) fn same_lines(stored: &[ItemLine], submitted: &[ItemLine]) -> bool {
    let mut stored: Vec<&ItemLine> = stored.iter().collect();
    let mut submitted: Vec<&ItemLine> = submitted.iter().collect();
    stored.sort();
    submitted.sort();
    stored == submitted
}
