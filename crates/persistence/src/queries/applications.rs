// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops_domain::{Application, ApplicationId};

use crate::data_models::ApplicationRow;
use crate::diesel_schema::applications;
use crate::error::PersistenceError;

/// # Errors
///
/// Returns `PersistenceError::ApplicationNotFound` if no row matches.
pub fn get_application(
    conn: &mut SqliteConnection,
    application_id: ApplicationId,
) -> Result<Application, PersistenceError> {
    let row: Option<ApplicationRow> = applications::table
        .filter(applications::application_id.eq(application_id.value()))
        .select(ApplicationRow::as_select())
        .first::<ApplicationRow>(conn)
        .optional()?;

    row.map(Application::from)
        .ok_or(PersistenceError::ApplicationNotFound(application_id.value()))
}
