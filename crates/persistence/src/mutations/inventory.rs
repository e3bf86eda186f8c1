// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops_domain::{JobOrderId, JobOrderItem};
use tracing::debug;

use crate::data_models::NewJobOrderItemRow;
use crate::diesel_schema::job_order_items;
use crate::error::PersistenceError;

/// Removes every ledger line of a job order.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_items_of(
    conn: &mut SqliteConnection,
    job_order_id: JobOrderId,
) -> Result<usize, PersistenceError> {
    let removed: usize = diesel::delete(
        job_order_items::table.filter(job_order_items::job_order_id.eq(job_order_id.value())),
    )
    .execute(conn)?;
    debug!(job_order_id = %job_order_id, removed, "Deleted inventory lines");
    Ok(removed)
}

/// Inserts ledger lines in one statement.
///
/// # Errors
///
/// Returns an error if a line references a missing job order or has a
/// non-positive quantity; nothing is inserted in that case.
pub fn insert_items(
    conn: &mut SqliteConnection,
    items: &[JobOrderItem],
) -> Result<usize, PersistenceError> {
    if items.is_empty() {
        return Ok(0);
    }
    let rows: Vec<NewJobOrderItemRow<'_>> = items.iter().map(NewJobOrderItemRow::from).collect();
    let inserted: usize = diesel::insert_into(job_order_items::table)
        .values(&rows)
        .execute(conn)?;
    debug!(inserted, "Inserted inventory lines");
    Ok(inserted)
}
