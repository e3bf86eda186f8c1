// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops_domain::{JobOrderId, JobOrderItem};

use crate::data_models::JobOrderItemRow;
use crate::diesel_schema::job_order_items;
use crate::error::PersistenceError;

/// Ledger lines of a job order in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_items_of(
    conn: &mut SqliteConnection,
    job_order_id: JobOrderId,
) -> Result<Vec<JobOrderItem>, PersistenceError> {
    let rows: Vec<JobOrderItemRow> = job_order_items::table
        .filter(job_order_items::job_order_id.eq(job_order_id.value()))
        .order(job_order_items::item_id.asc())
        .select(JobOrderItemRow::as_select())
        .load::<JobOrderItemRow>(conn)?;
    Ok(rows.into_iter().map(JobOrderItem::from).collect())
}
