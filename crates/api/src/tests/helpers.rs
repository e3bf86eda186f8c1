// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fieldops::{CommitOrchestrator, LookupCatalog, Stores};
use fieldops_audit::Cause;
use fieldops_domain::{
    ApplicationId, CustomerDetails, LocationId, LocationKind, LocationNode, LocationPath,
    MediaKind,
};
use fieldops_persistence::{
    CatalogEntry, DEFAULT_MAX_MEDIA_BYTES, FsMediaStore, Persistence, SharedPersistence,
};

use crate::{
    AuthenticatedActor, CustomerInfo, ItemLineInfo, JobOrderCandidateInfo, JobOrderFieldsInfo,
    JobOrderInfo,
    LocationPathInfo, MediaSlotInfo, Role,
};

pub const R1: i64 = 1;
pub const R2: i64 = 2;
pub const C1: i64 = 10;
pub const C2: i64 = 20;
pub const B1: i64 = 100;
pub const B2: i64 = 200;
pub const L1: i64 = 1000;
pub const L2: i64 = 2000;

static MEDIA_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn create_test_dispatcher() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("dispatch-7"), Role::Dispatcher)
}

pub fn create_test_technician() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("tech-42"), Role::Technician)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// An orchestrator over seeded in-memory stores. The media directory is
/// removed when the fixture drops.
pub struct TestApi {
    pub orchestrator: CommitOrchestrator,
    pub persistence: SharedPersistence,
    pub application_id: ApplicationId,
    media_dir: PathBuf,
}

impl Drop for TestApi {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_dir);
    }
}

fn node(id: i64, kind: LocationKind, name: &str, parent_id: Option<i64>) -> LocationNode {
    LocationNode {
        id: LocationId::new(id),
        kind,
        name: String::from(name),
        parent_id: parent_id.map(LocationId::new),
    }
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

pub fn create_test_api() -> TestApi {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_location_nodes(&[
            node(R1, LocationKind::Region, "Region I", None),
            node(R2, LocationKind::Region, "Region II", None),
            node(C1, LocationKind::City, "San Fernando", Some(R1)),
            node(C2, LocationKind::City, "Tuguegarao", Some(R2)),
            node(B1, LocationKind::Barangay, "Catbangen", Some(C1)),
            node(B2, LocationKind::Barangay, "Ugac Norte", Some(C2)),
            node(L1, LocationKind::Location, "Purok 1", Some(B1)),
            node(L2, LocationKind::Location, "Purok 7", Some(B2)),
        ])
        .unwrap();
    persistence
        .insert_catalog_entries(
            LookupCatalog::Plans,
            &[
                CatalogEntry::new(2, "Fiber 100", None),
                CatalogEntry::new(1, "Fiber 50", None),
            ],
        )
        .unwrap();
    persistence
        .insert_catalog_entries(
            LookupCatalog::LcpNaps,
            &[CatalogEntry::new(7, "LCP-01/NAP-03", None)],
        )
        .unwrap();
    persistence
        .insert_catalog_entries(
            LookupCatalog::Ports,
            &[
                CatalogEntry::new(72, "Port 2", Some(7)),
                CatalogEntry::new(71, "Port 1", Some(7)),
            ],
        )
        .unwrap();
    let application_id: ApplicationId = persistence
        .insert_application(
            &create_test_customer(),
            &LocationPath::new(
                Some(LocationId::new(R1)),
                Some(LocationId::new(C1)),
                Some(LocationId::new(B1)),
                Some(LocationId::new(L1)),
            ),
            Some("Fiber 50"),
            None,
        )
        .unwrap();

    let n: u64 = MEDIA_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let media_dir: PathBuf =
        std::env::temp_dir().join(format!("fieldops-api-{}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&media_dir);
    let media: FsMediaStore = FsMediaStore::new(&media_dir, DEFAULT_MAX_MEDIA_BYTES).unwrap();

    let persistence: SharedPersistence = SharedPersistence::new(persistence);
    let orchestrator: CommitOrchestrator = CommitOrchestrator::new(Stores {
        lookups: Arc::new(persistence.clone()),
        media: Arc::new(media),
        job_orders: Arc::new(persistence.clone()),
        applications: Arc::new(persistence.clone()),
        ledger: Arc::new(persistence.clone()),
    });

    TestApi {
        orchestrator,
        persistence,
        application_id,
        media_dir,
    }
}

pub fn create_test_customer_info() -> CustomerInfo {
    let customer: CustomerDetails = create_test_customer();
    CustomerInfo {
        first_name: customer.first_name,
        middle_initial: customer.middle_initial,
        last_name: customer.last_name,
        mobile_number: customer.mobile_number,
        secondary_mobile_number: customer.secondary_mobile_number,
        email: customer.email,
        installation_address: customer.installation_address,
    }
}

/// A candidate that keeps the job order as it is.
pub fn unchanged_candidate(job_order: &JobOrderInfo) -> JobOrderCandidateInfo {
    JobOrderCandidateInfo {
        status: job_order.status.clone(),
        fields: job_order.fields.clone(),
        customer: create_test_customer_info(),
        media: job_order
            .media
            .iter()
            .map(|(kind, reference)| {
                (
                    kind.clone(),
                    MediaSlotInfo::Existing {
                        reference: reference.clone(),
                    },
                )
            })
            .collect(),
        items: Vec::new(),
    }
}

/// A complete `done` antenna installation with every capture attached.
pub fn done_candidate(job_order: &JobOrderInfo) -> JobOrderCandidateInfo {
    let mut candidate: JobOrderCandidateInfo = unchanged_candidate(job_order);
    candidate.status = String::from("done");
    let fields: &mut JobOrderFieldsInfo = &mut candidate.fields;
    fields.date_installed = Some(String::from("2026-03-14"));
    fields.usage_type = Some(String::from("Residential"));
    fields.connection_type = Some(String::from("antenna"));
    fields.router_model = Some(String::from("HG8145V5"));
    fields.modem_serial = Some(String::from("48575443A1B2C3D4"));
    fields.ip = Some(String::from("10.20.30.40"));
    fields.visit_by = Some(String::from("Juan"));
    fields.visit_with = Some(String::from("Pedro"));
    fields.visit_with_other = Some(String::from("None"));
    fields.onsite_remarks = Some(String::from("Installed and tested"));
    fields.address_coordinates = Some(String::from("16.6159,120.3166"));

    let media: BTreeMap<String, MediaSlotInfo> = MediaKind::ALL
        .into_iter()
        .map(|kind| {
            (
                String::from(kind.as_str()),
                MediaSlotInfo::Attached {
                    file_name: format!("{kind}.jpg"),
                    content_type: String::from("image/jpeg"),
                    bytes: vec![0xFF, 0xD8, 0xFF],
                },
            )
        })
        .collect();
    candidate.media = media;
    candidate.items = vec![
        ItemLineInfo {
            item_name: String::from("Drop cable (m)"),
            quantity: 80,
        },
        ItemLineInfo {
            item_name: String::from("ONU"),
            quantity: 1,
        },
    ];
    candidate
}

pub const fn path_two_info() -> LocationPathInfo {
    LocationPathInfo {
        region_id: Some(R2),
        city_id: Some(C2),
        barangay_id: Some(B2),
        location_id: Some(L2),
    }
}
