// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job order writes.
//!
//! A job order row and its audit event are always written in one
//! transaction: the history never shows a transition whose row write
//! failed, and a row never changes without its event.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops::{JobOrderUpdate, NewJobOrder};
use fieldops_audit::AuditEvent;
use fieldops_domain::{JobOrder, JobOrderId, JobOrderStatus, MediaRef, MediaSet};
use tracing::info;

use crate::data_models::JobOrderValues;
use crate::diesel_schema::job_orders;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::now_timestamp;
use crate::queries::job_orders::get_job_order;

/// Creates an `InProgress` job order together with its assignment event.
///
/// # Errors
///
/// Returns an error if the application does not exist or a write fails;
/// nothing is written in that case.
pub fn create_job_order(
    conn: &mut SqliteConnection,
    new_job_order: &NewJobOrder,
) -> Result<(JobOrder, AuditEvent), PersistenceError> {
    let values: JobOrderValues = JobOrderValues::new(
        JobOrderStatus::InProgress,
        &new_job_order.fields,
        &MediaSet::<MediaRef>::new(),
        &[],
    )?;

    let (job_order, event): (JobOrder, AuditEvent) =
        conn.transaction::<_, PersistenceError, _>(|conn| {
            let id: i64 = diesel::insert_into(job_orders::table)
                .values((
                    job_orders::application_id.eq(new_job_order.application_id.value()),
                    &values,
                ))
                .returning(job_orders::job_order_id)
                .get_result(conn)?;
            let job_order_id: JobOrderId = JobOrderId::new(id);
            let event: AuditEvent =
                persist_audit_event(conn, &new_job_order.audit_event(job_order_id))?;
            Ok((get_job_order(conn, job_order_id)?, event))
        })?;

    info!(
        job_order_id = %job_order.id,
        application_id = %job_order.application_id,
        "Created job order"
    );
    Ok((job_order, event))
}

/// Writes status, fields, media references and accepted inventory lines of
/// a job order and records `update.audit_event` against it.
///
/// # Errors
///
/// Returns `PersistenceError::JobOrderNotFound` if no row matches, or any
/// write error; nothing is written in either case.
pub fn update_job_order(
    conn: &mut SqliteConnection,
    job_order_id: JobOrderId,
    update: &JobOrderUpdate,
) -> Result<AuditEvent, PersistenceError> {
    let values: JobOrderValues = JobOrderValues::new(
        update.status,
        &update.fields,
        &update.media,
        &update.accepted_items,
    )?;
    let updated_at: String = now_timestamp()?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(
            job_orders::table.filter(job_orders::job_order_id.eq(job_order_id.value())),
        )
        .set((&values, job_orders::updated_at.eq(&updated_at)))
        .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::JobOrderNotFound(job_order_id.value()));
        }

        let mut event: AuditEvent = update.audit_event.clone();
        event.job_order_id = job_order_id;
        persist_audit_event(conn, &event)
    })
}
