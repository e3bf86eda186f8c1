// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use fieldops::{LookupCatalog, NewJobOrder};
use fieldops_audit::{Actor, Cause};
use fieldops_domain::{
    ApplicationId, CustomerDetails, JobOrderFields, LocationId, LocationKind, LocationNode,
    LocationPath,
};

use crate::{CatalogEntry, Persistence};

pub const R1: LocationId = LocationId::new(1);
pub const R2: LocationId = LocationId::new(2);
pub const C1: LocationId = LocationId::new(10);
pub const C2: LocationId = LocationId::new(20);
pub const B1: LocationId = LocationId::new(100);
pub const B2: LocationId = LocationId::new(200);
pub const L1: LocationId = LocationId::new(1000);
pub const L2: LocationId = LocationId::new(2000);

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

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
    // Children first on purpose; seeding must order them.
    vec![
        node(L1, LocationKind::Location, "Purok 1", Some(B1)),
        node(L2, LocationKind::Location, "Purok 7", Some(B2)),
        node(B1, LocationKind::Barangay, "Catbangen", Some(C1)),
        node(B2, LocationKind::Barangay, "Ugac Norte", Some(C2)),
        node(C1, LocationKind::City, "San Fernando", Some(R1)),
        node(C2, LocationKind::City, "Tuguegarao", Some(R2)),
        node(R2, LocationKind::Region, "Region II", None),
        node(R1, LocationKind::Region, "Region I", None),
    ]
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

/// In-memory persistence with the location hierarchy and a few catalogs.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_location_nodes(&create_test_nodes())
        .unwrap();
    persistence
        .insert_catalog_entries(
            LookupCatalog::Plans,
            &[
                CatalogEntry::new(1, "Fiber 50", None),
                CatalogEntry::new(2, "Fiber 100", None),
            ],
        )
        .unwrap();
    persistence
        .insert_catalog_entries(
            LookupCatalog::LcpNaps,
            &[
                CatalogEntry::new(7, "LCP-01/NAP-03", None),
                CatalogEntry::new(8, "LCP-02/NAP-01", None),
            ],
        )
        .unwrap();
    persistence
        .insert_catalog_entries(
            LookupCatalog::Ports,
            &[
                CatalogEntry::new(72, "Port 2", Some(7)),
                CatalogEntry::new(71, "Port 1", Some(7)),
                CatalogEntry::new(81, "Port 1", Some(8)),
            ],
        )
        .unwrap();
    persistence
}

pub fn insert_test_application(persistence: &mut Persistence) -> ApplicationId {
    persistence
        .insert_application(
            &create_test_customer(),
            &path_one(),
            Some("Fiber 50"),
            Some("Summer Promo"),
        )
        .unwrap()
}

pub fn create_new_job_order(application_id: ApplicationId) -> NewJobOrder {
    NewJobOrder {
        application_id,
        fields: JobOrderFields {
            plan: Some(String::from("Fiber 50")),
            promo: Some(String::from("Summer Promo")),
            group_assignment: Some(String::from("Team North")),
            location: path_one(),
            ..JobOrderFields::default()
        },
        actor: create_test_actor(),
        cause: create_test_cause(),
    }
}

/// A fresh directory under the system temp dir; removed by the caller.
pub fn create_temp_dir(label: &str) -> PathBuf {
    let n: u64 = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir: PathBuf =
        std::env::temp_dir().join(format!("fieldops-{label}-{}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
