// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store trait implementations over one shared connection.

use std::sync::{Arc, Mutex, PoisonError};

use fieldops::{
    ApplicationStore, ApplicationUpdate, InventoryLedgerStore, JobOrderStore, JobOrderUpdate,
    LookupCatalog, LookupProvider, NewJobOrder, StoreError,
};
use fieldops_audit::AuditEvent;
use fieldops_domain::{
    Application, ApplicationId, JobOrder, JobOrderId, JobOrderItem, LocationNode, LookupEntry,
};
use tracing::error;

use crate::Persistence;
use crate::error::PersistenceError;

/// A `Persistence` shared between the orchestrator's stores and the API.
///
/// Every call takes the connection lock for its own duration only, so each
/// trait call is its own unit of work.
#[derive(Debug, Clone)]
pub struct SharedPersistence {
    inner: Arc<Mutex<Persistence>>,
}

impl SharedPersistence {
    #[must_use]
    pub fn new(persistence: Persistence) -> Self {
        Self {
            inner: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with<T>(&self, f: impl FnOnce(&mut Persistence) -> T) -> T {
        let mut persistence = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut persistence)
    }

    fn call<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Persistence) -> Result<T, PersistenceError>,
    ) -> Result<T, StoreError> {
        self.with(f).map_err(|e| {
            if !matches!(
                e,
                PersistenceError::JobOrderNotFound(_) | PersistenceError::ApplicationNotFound(_)
            ) {
                error!(operation, error = %e, "Persistence call failed");
            }
            StoreError::from(e)
        })
    }
}

impl LookupProvider for SharedPersistence {
    fn list_location_nodes(&self) -> Result<Vec<LocationNode>, StoreError> {
        self.call("list_location_nodes", Persistence::list_location_nodes)
    }

    fn list_catalog(
        &self,
        catalog: LookupCatalog,
        parent_id: Option<i64>,
    ) -> Result<Vec<LookupEntry>, StoreError> {
        self.call("list_catalog", |p| p.list_catalog(catalog, parent_id))
    }
}

impl JobOrderStore for SharedPersistence {
    fn get(&self, id: JobOrderId) -> Result<JobOrder, StoreError> {
        self.call("get_job_order", |p| p.get_job_order(id))
    }

    fn update(&self, id: JobOrderId, update: &JobOrderUpdate) -> Result<AuditEvent, StoreError> {
        self.call("update_job_order", |p| p.update_job_order(id, update))
    }

    fn create(&self, new_job_order: &NewJobOrder) -> Result<JobOrder, StoreError> {
        self.call("create_job_order", |p| {
            p.create_job_order(new_job_order)
                .map(|(job_order, _)| job_order)
        })
    }

    fn record_event(&self, event: &AuditEvent) -> Result<AuditEvent, StoreError> {
        self.call("record_audit_event", |p| p.record_audit_event(event))
    }

    fn history(&self, id: JobOrderId) -> Result<Vec<AuditEvent>, StoreError> {
        self.call("get_audit_timeline", |p| p.get_audit_timeline(id))
    }
}

impl ApplicationStore for SharedPersistence {
    fn get(&self, id: ApplicationId) -> Result<Application, StoreError> {
        self.call("get_application", |p| p.get_application(id))
    }

    fn update(&self, id: ApplicationId, update: &ApplicationUpdate) -> Result<(), StoreError> {
        self.call("update_application", |p| p.update_application(id, update))
    }
}

impl InventoryLedgerStore for SharedPersistence {
    fn list_items_of(&self, job_order_id: JobOrderId) -> Result<Vec<JobOrderItem>, StoreError> {
        self.call("list_items_of", |p| p.list_items_of(job_order_id))
    }

    fn delete_items_of(&self, job_order_id: JobOrderId) -> Result<usize, StoreError> {
        self.call("delete_items_of", |p| p.delete_items_of(job_order_id))
    }

    fn insert_items(&self, items: &[JobOrderItem]) -> Result<(), StoreError> {
        self.call("insert_items", |p| p.insert_items(items).map(|_| ()))
    }
}
