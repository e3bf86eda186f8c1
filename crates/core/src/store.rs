// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator interfaces.
//!
//! The workflow writes to three independent records through three
//! independent stores, none of which shares a transaction with the others.
//! Implementations take `&self` and synchronize internally.

use fieldops_audit::AuditEvent;
use fieldops_domain::{
    Application, ApplicationId, JobOrder, JobOrderId, JobOrderItem, LocationId, LocationKind,
    LocationNode, LookupEntry, MediaFile, MediaKind, MediaRef,
};
use std::fmt;
use thiserror::Error;

use crate::state::{ApplicationUpdate, JobOrderUpdate, NewJobOrder};

/// Failure reported by a collaborator store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    /// The store refused the input (size, type, constraint).
    #[error("Rejected: {0}")]
    Rejected(String),
    /// The store could not be reached or failed internally.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Static catalogs served by the lookup provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LookupCatalog {
    Plans,
    Promos,
    Groups,
    Technicians,
    InventoryItems,
    RouterModels,
    LcpNaps,
    Ports,
    Vlans,
    UsageTypes,
}

impl LookupCatalog {
    pub const ALL: [Self; 10] = [
        Self::Plans,
        Self::Promos,
        Self::Groups,
        Self::Technicians,
        Self::InventoryItems,
        Self::RouterModels,
        Self::LcpNaps,
        Self::Ports,
        Self::Vlans,
        Self::UsageTypes,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plans => "plans",
            Self::Promos => "promos",
            Self::Groups => "groups",
            Self::Technicians => "technicians",
            Self::InventoryItems => "inventory_items",
            Self::RouterModels => "router_models",
            Self::LcpNaps => "lcp_naps",
            Self::Ports => "ports",
            Self::Vlans => "vlans",
            Self::UsageTypes => "usage_types",
        }
    }

    /// Parses the catalog name used in persistence and on the wire.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for LookupCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only catalogs and the location hierarchy.
///
/// "No results" is an empty list, never an error.
pub trait LookupProvider: Send + Sync {
    /// Every node of the location hierarchy.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_location_nodes(&self) -> Result<Vec<LocationNode>, StoreError>;

    /// Entries of a catalog; `parent_id` narrows dependent catalogs (ports
    /// of an LCP/NAP).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_catalog(
        &self,
        catalog: LookupCatalog,
        parent_id: Option<i64>,
    ) -> Result<Vec<LookupEntry>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_regions(&self) -> Result<Vec<LookupEntry>, StoreError> {
        self.list_location_children(LocationKind::Region, None)
    }

    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_cities_of(&self, region_id: LocationId) -> Result<Vec<LookupEntry>, StoreError> {
        self.list_location_children(LocationKind::City, Some(region_id))
    }

    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_barangays_of(&self, city_id: LocationId) -> Result<Vec<LookupEntry>, StoreError> {
        self.list_location_children(LocationKind::Barangay, Some(city_id))
    }

    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_locations_of(&self, barangay_id: LocationId) -> Result<Vec<LookupEntry>, StoreError> {
        self.list_location_children(LocationKind::Location, Some(barangay_id))
    }

    /// Nodes of `kind` hanging off `parent_id`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_location_children(
        &self,
        kind: LocationKind,
        parent_id: Option<LocationId>,
    ) -> Result<Vec<LookupEntry>, StoreError> {
        let mut nodes: Vec<LocationNode> = self
            .list_location_nodes()?
            .into_iter()
            .filter(|node| node.kind == kind && node.parent_id == parent_id)
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(nodes
            .into_iter()
            .map(|node| LookupEntry {
                id: node.id.value(),
                display_name: node.name,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the provider cannot be read.
    fn list_ports(&self, lcp_nap_id: i64) -> Result<Vec<LookupEntry>, StoreError> {
        self.list_catalog(LookupCatalog::Ports, Some(lcp_nap_id))
    }
}

/// Durable storage for captured images.
pub trait MediaStore: Send + Sync {
    /// Stores `file` and returns its durable reference.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Rejected` for files the store will not accept
    /// and `StoreError::Unavailable` on I/O failure.
    fn upload(&self, kind: MediaKind, file: &MediaFile) -> Result<MediaRef, StoreError>;
}

/// The job order record and its audit history.
pub trait JobOrderStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the job order does not exist.
    fn get(&self, id: JobOrderId) -> Result<JobOrder, StoreError>;

    /// Writes status, fields and media references, and records the audit
    /// event in the same unit of work. Returns the stored event.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was written.
    fn update(&self, id: JobOrderId, update: &JobOrderUpdate) -> Result<AuditEvent, StoreError>;

    /// Creates an `InProgress` job order.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was written.
    fn create(&self, new_job_order: &NewJobOrder) -> Result<JobOrder, StoreError>;

    /// Appends an event to the job order's history without touching the
    /// job order. Returns the stored event.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was written.
    fn record_event(&self, event: &AuditEvent) -> Result<AuditEvent, StoreError>;

    /// Audit events of a job order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    fn history(&self, id: JobOrderId) -> Result<Vec<AuditEvent>, StoreError>;
}

/// The denormalized customer application record.
pub trait ApplicationStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the application does not exist.
    fn get(&self, id: ApplicationId) -> Result<Application, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the update was not written.
    fn update(&self, id: ApplicationId, update: &ApplicationUpdate) -> Result<(), StoreError>;
}

/// Consumed-inventory lines keyed by job order.
pub trait InventoryLedgerStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn list_items_of(&self, job_order_id: JobOrderId) -> Result<Vec<JobOrderItem>, StoreError>;

    /// Deletes every line of the job order, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the lines were not deleted.
    fn delete_items_of(&self, job_order_id: JobOrderId) -> Result<usize, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the lines were not inserted.
    fn insert_items(&self, items: &[JobOrderItem]) -> Result<(), StoreError>;
}
