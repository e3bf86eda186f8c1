// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fieldops_audit::{Actor, AuditEvent, Cause};
use fieldops_domain::{
    Application, ApplicationId, ConnectionType, CustomerDetails, ItemLine, JobOrder,
    JobOrderCandidate, JobOrderFields, JobOrderId, JobOrderItem, JobOrderStatus,
    LocationHierarchy, LocationId, LocationKind, LocationNode, LocationPath, LookupEntry,
    MediaCapture, MediaFile, MediaKind, MediaRef, MediaSet,
};
use time::macros::date;

use crate::{
    ApplicationStore, ApplicationUpdate, CommitOrchestrator, InventoryLedgerStore, JobOrderState,
    JobOrderStore, JobOrderUpdate, LookupCatalog, LookupProvider, MediaStore, NewJobOrder,
    StoreError, Stores,
};

pub const R1: LocationId = LocationId::new(1);
pub const R2: LocationId = LocationId::new(2);
pub const C1: LocationId = LocationId::new(10);
pub const C2: LocationId = LocationId::new(20);
pub const B1: LocationId = LocationId::new(100);
pub const B2: LocationId = LocationId::new(200);
pub const L1: LocationId = LocationId::new(1000);
pub const L2: LocationId = LocationId::new(2000);

pub const JOB_ORDER_ID: JobOrderId = JobOrderId::new(1);
pub const APPLICATION_ID: ApplicationId = ApplicationId::new(501);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("tech-42"), String::from("technician"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Installation form"))
}

pub fn create_test_nodes() -> Vec<LocationNode> {
    let node = |id: LocationId, kind: LocationKind, name: &str, parent_id: Option<LocationId>| {
        LocationNode {
            id,
            kind,
            name: String::from(name),
            parent_id,
        }
    };
    vec![
        node(R1, LocationKind::Region, "Region I", None),
        node(R2, LocationKind::Region, "Region II", None),
        node(C1, LocationKind::City, "San Fernando", Some(R1)),
        node(C2, LocationKind::City, "Tuguegarao", Some(R2)),
        node(B1, LocationKind::Barangay, "Catbangen", Some(C1)),
        node(B2, LocationKind::Barangay, "Ugac Norte", Some(C2)),
        node(L1, LocationKind::Location, "Purok 1", Some(B1)),
        node(L2, LocationKind::Location, "Purok 7", Some(B2)),
    ]
}

pub fn create_test_hierarchy() -> LocationHierarchy {
    LocationHierarchy::from_nodes(create_test_nodes()).unwrap()
}

pub fn path_one() -> LocationPath {
    LocationPath::new(Some(R1), Some(C1), Some(B1), Some(L1))
}

pub fn path_two() -> LocationPath {
    LocationPath::new(Some(R2), Some(C2), Some(B2), Some(L2))
}

pub fn create_test_customer() -> CustomerDetails {
    CustomerDetails {
        first_name: String::from("Maria"),
        middle_initial: Some(String::from("L")),
        last_name: String::from("Santos"),
        mobile_number: String::from("09171234567"),
        secondary_mobile_number: None,
        email: Some(String::from("maria.santos@example.com")),
        installation_address: String::from("12 Rizal St, Catbangen"),
    }
}

pub fn create_test_application() -> Application {
    Application {
        id: APPLICATION_ID,
        customer: create_test_customer(),
        location: path_one(),
        plan: Some(String::from("Fiber 50")),
        promo: Some(String::from("Summer Promo")),
    }
}

pub fn create_test_job_order() -> JobOrder {
    JobOrder {
        id: JOB_ORDER_ID,
        application_id: APPLICATION_ID,
        status: JobOrderStatus::InProgress,
        fields: JobOrderFields {
            plan: Some(String::from("Fiber 50")),
            promo: Some(String::from("Summer Promo")),
            group_assignment: Some(String::from("Team North")),
            location: path_one(),
            ..JobOrderFields::default()
        },
        media: MediaSet::new(),
        accepted_items: Vec::new(),
    }
}

pub fn create_test_state() -> JobOrderState {
    JobOrderState {
        job_order: create_test_job_order(),
        application: create_test_application(),
        items: Vec::new(),
    }
}

pub fn test_image(name: &str) -> MediaFile {
    MediaFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

pub fn edit_candidate(job_order: &JobOrder) -> JobOrderCandidate {
    JobOrderCandidate::from_job_order(job_order, create_test_customer(), Vec::new())
}

pub fn failed_candidate(job_order: &JobOrder) -> JobOrderCandidate {
    let mut candidate: JobOrderCandidate = edit_candidate(job_order);
    candidate.status = JobOrderStatus::Failed;
    candidate.fields.visit_by = Some(String::from("Juan"));
    candidate.fields.visit_with = Some(String::from("Pedro"));
    candidate.fields.visit_with_other = Some(String::from("None"));
    candidate.fields.onsite_remarks = Some(String::from("Customer not home"));
    candidate.fields.status_remarks = Some(String::from("No access to premises"));
    candidate
}

pub fn done_candidate(job_order: &JobOrder, connection_type: ConnectionType) -> JobOrderCandidate {
    let mut candidate: JobOrderCandidate = edit_candidate(job_order);
    candidate.status = JobOrderStatus::Done;

    let fields: &mut JobOrderFields = &mut candidate.fields;
    fields.date_installed = Some(date!(2026 - 03 - 14));
    fields.usage_type = Some(String::from("Residential"));
    fields.connection_type = Some(connection_type);
    fields.router_model = Some(String::from("HG8145V5"));
    fields.modem_serial = Some(String::from("48575443A1B2C3D4"));
    fields.visit_by = Some(String::from("Juan"));
    fields.visit_with = Some(String::from("Pedro"));
    fields.visit_with_other = Some(String::from("None"));
    fields.onsite_remarks = Some(String::from("Installed and tested"));
    fields.address_coordinates = Some(String::from("16.6159,120.3166"));
    match connection_type {
        ConnectionType::Antenna => fields.ip = Some(String::from("10.20.30.40")),
        ConnectionType::Fiber => {
            fields.lcp_nap = Some(String::from("LCP-01/NAP-03"));
            fields.port = Some(String::from("4"));
            fields.vlan = Some(String::from("120"));
        }
        ConnectionType::Local => {}
    }

    for kind in MediaKind::STANDARD {
        candidate
            .media
            .insert(kind, MediaCapture::Attached(test_image(kind.as_str())));
    }
    if connection_type != ConnectionType::Fiber {
        candidate.media.insert(
            MediaKind::PortLabelImage,
            MediaCapture::Attached(test_image("port_label_image")),
        );
    }

    candidate.items = vec![
        ItemLine::new("Drop cable (m)", 120),
        ItemLine::new("F-connector", 2),
    ];
    candidate
}

/// Which store calls should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub upload: bool,
    pub job_order_update: bool,
    pub record_event: bool,
    pub application_update: bool,
    pub delete_items: bool,
    pub insert_items: bool,
}

/// One in-memory backend behind every store trait.
#[derive(Debug, Default)]
pub struct FakeStores {
    pub nodes: Mutex<Vec<LocationNode>>,
    pub job_orders: Mutex<HashMap<JobOrderId, JobOrder>>,
    pub applications: Mutex<HashMap<ApplicationId, Application>>,
    pub items: Mutex<Vec<JobOrderItem>>,
    pub events: Mutex<Vec<AuditEvent>>,
    pub uploads: Mutex<Vec<(MediaKind, MediaFile)>>,
    pub failures: Mutex<Failures>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeStores {
    pub fn seeded() -> Arc<Self> {
        let stores: Self = Self::default();
        *stores.nodes.lock().unwrap() = create_test_nodes();
        stores
            .job_orders
            .lock()
            .unwrap()
            .insert(JOB_ORDER_ID, create_test_job_order());
        stores
            .applications
            .lock()
            .unwrap()
            .insert(APPLICATION_ID, create_test_application());
        Arc::new(stores)
    }

    pub fn fail(&self, f: impl FnOnce(&mut Failures)) {
        f(&mut self.failures.lock().unwrap());
    }

    pub fn job_order(&self) -> JobOrder {
        self.job_orders.lock().unwrap()[&JOB_ORDER_ID].clone()
    }

    pub fn application(&self) -> Application {
        self.applications.lock().unwrap()[&APPLICATION_ID].clone()
    }

    pub fn lines_of(&self, id: JobOrderId) -> Vec<ItemLine> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.job_order_id == id)
            .map(JobOrderItem::to_line)
            .collect()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn push_event(&self, event: &AuditEvent) -> AuditEvent {
        let mut events = self.events.lock().unwrap();
        let event: AuditEvent = event
            .clone()
            .with_event_id(i64::try_from(events.len()).unwrap() + 1);
        events.push(event.clone());
        event
    }

    fn failures(&self) -> Failures {
        *self.failures.lock().unwrap()
    }
}

pub fn create_test_orchestrator(stores: &Arc<FakeStores>) -> CommitOrchestrator {
    CommitOrchestrator::new(Stores {
        lookups: stores.clone(),
        media: stores.clone(),
        job_orders: stores.clone(),
        applications: stores.clone(),
        ledger: stores.clone(),
    })
}

fn unavailable(what: &str) -> StoreError {
    StoreError::Unavailable(format!("{what}: connection reset"))
}

impl LookupProvider for FakeStores {
    fn list_location_nodes(&self) -> Result<Vec<LocationNode>, StoreError> {
        Ok(self.nodes.lock().unwrap().clone())
    }

    fn list_catalog(
        &self,
        catalog: LookupCatalog,
        parent_id: Option<i64>,
    ) -> Result<Vec<LookupEntry>, StoreError> {
        let entries: Vec<LookupEntry> = match (catalog, parent_id) {
            (LookupCatalog::Plans, _) => vec![LookupEntry {
                id: 1,
                display_name: String::from("Fiber 50"),
            }],
            (LookupCatalog::Ports, Some(7)) => vec![LookupEntry {
                id: 71,
                display_name: String::from("Port 1"),
            }],
            _ => Vec::new(),
        };
        Ok(entries)
    }
}

impl MediaStore for FakeStores {
    fn upload(&self, kind: MediaKind, file: &MediaFile) -> Result<MediaRef, StoreError> {
        self.record("upload");
        if self.failures().upload {
            return Err(unavailable("media"));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((kind, file.clone()));
        Ok(MediaRef::new(format!("media/{}-{}", uploads.len(), kind)))
    }
}

impl JobOrderStore for FakeStores {
    fn get(&self, id: JobOrderId) -> Result<JobOrder, StoreError> {
        self.job_orders
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "job order",
                id: id.value(),
            })
    }

    fn update(&self, id: JobOrderId, update: &JobOrderUpdate) -> Result<AuditEvent, StoreError> {
        self.record("update_job_order");
        if self.failures().job_order_update {
            return Err(unavailable("job orders"));
        }
        let mut job_orders = self.job_orders.lock().unwrap();
        let job_order: &mut JobOrder = job_orders.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "job order",
            id: id.value(),
        })?;
        job_order.status = update.status;
        job_order.fields = update.fields.clone();
        job_order.media = update.media.clone();
        job_order.accepted_items = update.accepted_items.clone();
        Ok(self.push_event(&update.audit_event))
    }

    fn record_event(&self, event: &AuditEvent) -> Result<AuditEvent, StoreError> {
        self.record("record_event");
        if self.failures().record_event {
            return Err(unavailable("audit"));
        }
        Ok(self.push_event(event))
    }

    fn create(&self, new_job_order: &NewJobOrder) -> Result<JobOrder, StoreError> {
        self.record("create_job_order");
        let mut job_orders = self.job_orders.lock().unwrap();
        let id: JobOrderId = JobOrderId::new(i64::try_from(job_orders.len()).unwrap() + 1);
        let job_order: JobOrder = JobOrder {
            id,
            application_id: new_job_order.application_id,
            status: JobOrderStatus::InProgress,
            fields: new_job_order.fields.clone(),
            media: MediaSet::new(),
            accepted_items: Vec::new(),
        };
        job_orders.insert(id, job_order.clone());
        self.events
            .lock()
            .unwrap()
            .push(new_job_order.audit_event(id));
        Ok(job_order)
    }

    fn history(&self, id: JobOrderId) -> Result<Vec<AuditEvent>, StoreError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.job_order_id == id)
            .cloned()
            .collect())
    }
}

impl ApplicationStore for FakeStores {
    fn get(&self, id: ApplicationId) -> Result<Application, StoreError> {
        self.applications
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "application",
                id: id.value(),
            })
    }

    fn update(&self, id: ApplicationId, update: &ApplicationUpdate) -> Result<(), StoreError> {
        self.record("sync_application");
        if self.failures().application_update {
            return Err(unavailable("applications"));
        }
        let mut applications = self.applications.lock().unwrap();
        let application: &mut Application =
            applications.get_mut(&id).ok_or(StoreError::NotFound {
                entity: "application",
                id: id.value(),
            })?;
        *application = update.apply_to(application);
        Ok(())
    }
}

impl InventoryLedgerStore for FakeStores {
    fn list_items_of(&self, job_order_id: JobOrderId) -> Result<Vec<JobOrderItem>, StoreError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.job_order_id == job_order_id)
            .cloned()
            .collect())
    }

    fn delete_items_of(&self, job_order_id: JobOrderId) -> Result<usize, StoreError> {
        self.record("delete_items");
        if self.failures().delete_items {
            return Err(unavailable("ledger"));
        }
        let mut items = self.items.lock().unwrap();
        let before: usize = items.len();
        items.retain(|item| item.job_order_id != job_order_id);
        Ok(before - items.len())
    }

    fn insert_items(&self, new_items: &[JobOrderItem]) -> Result<(), StoreError> {
        self.record("insert_items");
        if self.failures().insert_items {
            return Err(unavailable("ledger"));
        }
        self.items.lock().unwrap().extend_from_slice(new_items);
        Ok(())
    }
}
