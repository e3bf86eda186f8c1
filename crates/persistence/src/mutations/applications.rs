// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops::ApplicationUpdate;
use fieldops_domain::{ApplicationId, CustomerDetails, LocationPath};
use tracing::debug;

use crate::data_models::ApplicationValues;
use crate::diesel_schema::applications;
use crate::error::PersistenceError;
use crate::mutations::now_timestamp;

/// Registers a customer application and returns its id.
///
/// # Errors
///
/// Returns an error if a location id does not exist.
pub fn insert_application(
    conn: &mut SqliteConnection,
    customer: &CustomerDetails,
    location: &LocationPath,
    plan: Option<&str>,
    promo: Option<&str>,
) -> Result<ApplicationId, PersistenceError> {
    let values: ApplicationValues = ApplicationValues::new(customer, location, plan, promo);
    let id: i64 = diesel::insert_into(applications::table)
        .values(&values)
        .returning(applications::application_id)
        .get_result(conn)?;

    debug!(application_id = id, "Inserted application");
    Ok(ApplicationId::new(id))
}

/// Overwrites the identity, location, plan and promo of an application.
///
/// # Errors
///
/// Returns `PersistenceError::ApplicationNotFound` if no row matches.
pub fn update_application(
    conn: &mut SqliteConnection,
    application_id: ApplicationId,
    update: &ApplicationUpdate,
) -> Result<(), PersistenceError> {
    let values: ApplicationValues = ApplicationValues::new(
        &update.customer,
        &update.location,
        update.plan.as_deref(),
        update.promo.as_deref(),
    );
    let updated: usize = diesel::update(
        applications::table.filter(applications::application_id.eq(application_id.value())),
    )
    .set((&values, applications::updated_at.eq(now_timestamp()?)))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ApplicationNotFound(application_id.value()));
    }
    debug!(application_id = %application_id, "Synchronized application");
    Ok(())
}
