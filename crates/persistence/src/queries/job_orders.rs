// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops_domain::{JobOrder, JobOrderId};

use crate::data_models::JobOrderRow;
use crate::diesel_schema::job_orders;
use crate::error::PersistenceError;

/// # Errors
///
/// Returns `PersistenceError::JobOrderNotFound` if no row matches, or a
/// reconstruction error for a corrupt row.
pub fn get_job_order(
    conn: &mut SqliteConnection,
    job_order_id: JobOrderId,
) -> Result<JobOrder, PersistenceError> {
    let row: Option<JobOrderRow> = job_orders::table
        .filter(job_orders::job_order_id.eq(job_order_id.value()))
        .select(JobOrderRow::as_select())
        .first::<JobOrderRow>(conn)
        .optional()?;

    row.ok_or(PersistenceError::JobOrderNotFound(job_order_id.value()))?
        .into_job_order()
}

