// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops::LookupCatalog;
use fieldops_domain::LocationNode;
use tracing::info;

use crate::data_models::CatalogEntry;
use crate::diesel_schema::{location_nodes, lookup_entries};
use crate::error::PersistenceError;

/// Inserts location nodes, parents before children, in one transaction.
///
/// # Errors
///
/// Returns an error if a node references a missing parent or an id is
/// already taken; nothing is inserted in that case.
pub fn insert_location_nodes(
    conn: &mut SqliteConnection,
    nodes: &[LocationNode],
) -> Result<usize, PersistenceError> {
    let mut ordered: Vec<&LocationNode> = nodes.iter().collect();
    ordered.sort_by_key(|node| (node.kind.depth(), node.id));

    conn.transaction::<_, PersistenceError, _>(|conn| {
        for node in &ordered {
            diesel::insert_into(location_nodes::table)
                .values((
                    location_nodes::node_id.eq(node.id.value()),
                    location_nodes::kind.eq(node.kind.as_str()),
                    location_nodes::name.eq(&node.name),
                    location_nodes::parent_id.eq(node.parent_id.map(|id| id.value())),
                ))
                .execute(conn)?;
        }
        Ok(())
    })?;

    info!(count = ordered.len(), "Seeded location nodes");
    Ok(ordered.len())
}

/// Inserts entries into `catalog` in one transaction.
///
/// # Errors
///
/// Returns an error if an entry id is already present in the catalog.
pub fn insert_catalog_entries(
    conn: &mut SqliteConnection,
    catalog: LookupCatalog,
    entries: &[CatalogEntry],
) -> Result<usize, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        for entry in entries {
            diesel::insert_into(lookup_entries::table)
                .values((
                    lookup_entries::catalog.eq(catalog.as_str()),
                    lookup_entries::entry_id.eq(entry.entry.id),
                    lookup_entries::display_name.eq(&entry.entry.display_name),
                    lookup_entries::parent_id.eq(entry.parent_id),
                ))
                .execute(conn)?;
        }
        Ok(())
    })?;

    info!(%catalog, count = entries.len(), "Seeded lookup catalog");
    Ok(entries.len())
}
