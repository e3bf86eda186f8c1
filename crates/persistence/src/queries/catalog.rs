// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops::LookupCatalog;
use fieldops_domain::{LocationNode, LookupEntry};

use crate::data_models::{LocationNodeRow, LookupEntryRow};
use crate::diesel_schema::{location_nodes, lookup_entries};
use crate::error::PersistenceError;

/// Every node of the location hierarchy, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored kind is unknown.
pub fn list_location_nodes(
    conn: &mut SqliteConnection,
) -> Result<Vec<LocationNode>, PersistenceError> {
    location_nodes::table
        .order(location_nodes::node_id.asc())
        .select(LocationNodeRow::as_select())
        .load::<LocationNodeRow>(conn)?
        .into_iter()
        .map(LocationNodeRow::into_node)
        .collect()
}

/// Entries of `catalog` ordered by display name. With `parent_id`, only
/// entries hanging off that parent.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_catalog(
    conn: &mut SqliteConnection,
    catalog: LookupCatalog,
    parent_id: Option<i64>,
) -> Result<Vec<LookupEntry>, PersistenceError> {
    let mut query = lookup_entries::table
        .filter(lookup_entries::catalog.eq(catalog.as_str()))
        .into_boxed();
    if let Some(parent_id) = parent_id {
        query = query.filter(lookup_entries::parent_id.eq(parent_id));
    }

    let rows: Vec<LookupEntryRow> = query
        .order((
            lookup_entries::display_name.asc(),
            lookup_entries::entry_id.asc(),
        ))
        .select(LookupEntryRow::as_select())
        .load::<LookupEntryRow>(conn)?;
    Ok(rows.into_iter().map(LookupEntry::from).collect())
}
