// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for field-service job orders.
//!
//! Diesel over `SQLite` backs every store the commit orchestrator writes to:
//! the lookup catalogs and location hierarchy, customer applications, job
//! orders with their audit history, and the consumed-inventory ledger.
//! Captured images go to the filesystem through [`FsMediaStore`].
//!
//! ## Databases
//!
//! - `new_in_memory()`: a fresh shared-cache in-memory database per call,
//!   used by tests and ephemeral servers
//! - `new_with_file()`: a file database in WAL mode
//!
//! Both run the embedded migrations in `migrations/` and refuse to start
//! unless foreign key enforcement is active.
//!
//! ## Units of work
//!
//! A job order row and its audit event are written in one transaction.
//! Applications and inventory lines are separate records and are written
//! by separate calls, so a failure in one never rolls back another.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fieldops::{ApplicationUpdate, JobOrderUpdate, LookupCatalog, NewJobOrder};
use fieldops_audit::AuditEvent;
use fieldops_domain::{
    Application, ApplicationId, CustomerDetails, JobOrder, JobOrderId, JobOrderItem, LocationNode,
    LocationPath, LookupEntry,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod media;
mod mutations;
mod queries;
mod stores;

#[cfg(test)]
mod tests;

pub use data_models::CatalogEntry;
pub use error::PersistenceError;
pub use media::{ACCEPTED_CONTENT_TYPES, DEFAULT_MAX_MEDIA_BYTES, FsMediaStore};
pub use stores::SharedPersistence;

/// Counter giving every `new_in_memory()` database a distinct name.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:fieldops_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a file database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Catalogs & Location Hierarchy
    // ========================================================================

    /// Seeds location nodes. Parents are inserted before their children.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent is missing or an id is taken.
    pub fn insert_location_nodes(&mut self, nodes: &[LocationNode]) -> Result<usize, PersistenceError> {
        mutations::catalog::insert_location_nodes(&mut self.conn, nodes)
    }

    /// Seeds entries of a lookup catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry id is already present in the catalog.
    pub fn insert_catalog_entries(
        &mut self,
        catalog: LookupCatalog,
        entries: &[CatalogEntry],
    ) -> Result<usize, PersistenceError> {
        mutations::catalog::insert_catalog_entries(&mut self.conn, catalog, entries)
    }

    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_location_nodes(&mut self) -> Result<Vec<LocationNode>, PersistenceError> {
        queries::catalog::list_location_nodes(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_catalog(
        &mut self,
        catalog: LookupCatalog,
        parent_id: Option<i64>,
    ) -> Result<Vec<LookupEntry>, PersistenceError> {
        queries::catalog::list_catalog(&mut self.conn, catalog, parent_id)
    }

    // ========================================================================
    // Applications
    // ========================================================================

    /// Registers a customer application.
    ///
    /// # Errors
    ///
    /// Returns an error if a location id does not exist.
    pub fn insert_application(
        &mut self,
        customer: &CustomerDetails,
        location: &LocationPath,
        plan: Option<&str>,
        promo: Option<&str>,
    ) -> Result<ApplicationId, PersistenceError> {
        mutations::applications::insert_application(&mut self.conn, customer, location, plan, promo)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::ApplicationNotFound` if it does not exist.
    pub fn get_application(
        &mut self,
        application_id: ApplicationId,
    ) -> Result<Application, PersistenceError> {
        queries::applications::get_application(&mut self.conn, application_id)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::ApplicationNotFound` if it does not exist.
    pub fn update_application(
        &mut self,
        application_id: ApplicationId,
        update: &ApplicationUpdate,
    ) -> Result<(), PersistenceError> {
        mutations::applications::update_application(&mut self.conn, application_id, update)
    }

    // ========================================================================
    // Job Orders & Audit
    // ========================================================================

    /// Creates a job order and its assignment event atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the application does not exist or a write fails.
    pub fn create_job_order(
        &mut self,
        new_job_order: &NewJobOrder,
    ) -> Result<(JobOrder, AuditEvent), PersistenceError> {
        mutations::job_orders::create_job_order(&mut self.conn, new_job_order)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::JobOrderNotFound` if it does not exist.
    pub fn get_job_order(&mut self, job_order_id: JobOrderId) -> Result<JobOrder, PersistenceError> {
        queries::job_orders::get_job_order(&mut self.conn, job_order_id)
    }

    /// Writes a transition and its audit event atomically.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::JobOrderNotFound` or a write error; nothing
    /// is written in either case.
    pub fn update_job_order(
        &mut self,
        job_order_id: JobOrderId,
        update: &JobOrderUpdate,
    ) -> Result<AuditEvent, PersistenceError> {
        mutations::job_orders::update_job_order(&mut self.conn, job_order_id, update)
    }

    /// Appends an event to a job order's history on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the job order does not exist or the write fails.
    pub fn record_audit_event(
        &mut self,
        event: &AuditEvent,
    ) -> Result<AuditEvent, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Audit events of a job order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_timeline(
        &mut self,
        job_order_id: JobOrderId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn, job_order_id)
    }

    // ========================================================================
    // Inventory Ledger
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_items_of(
        &mut self,
        job_order_id: JobOrderId,
    ) -> Result<Vec<JobOrderItem>, PersistenceError> {
        queries::inventory::list_items_of(&mut self.conn, job_order_id)
    }

    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_items_of(&mut self, job_order_id: JobOrderId) -> Result<usize, PersistenceError> {
        mutations::inventory::delete_items_of(&mut self.conn, job_order_id)
    }

    /// # Errors
    ///
    /// Returns an error if any line is rejected; nothing is inserted then.
    pub fn insert_items(&mut self, items: &[JobOrderItem]) -> Result<usize, PersistenceError> {
        mutations::inventory::insert_items(&mut self.conn, items)
    }
}
