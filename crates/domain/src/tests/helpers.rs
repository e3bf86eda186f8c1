// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::date;

use crate::{
    ConnectionType, CustomerDetails, ItemLine, JobOrderCandidate, JobOrderFields, JobOrderStatus,
    LocationHierarchy, LocationId, LocationKind, LocationNode, LocationPath, MediaCapture,
    MediaFile, MediaKind, MediaRef, MediaSet,
};

pub const R1: LocationId = LocationId::new(1);
pub const R2: LocationId = LocationId::new(2);
pub const C1: LocationId = LocationId::new(10);
pub const C2: LocationId = LocationId::new(20);
pub const C3: LocationId = LocationId::new(11);
pub const B1: LocationId = LocationId::new(100);
pub const B2: LocationId = LocationId::new(200);
pub const L1: LocationId = LocationId::new(1000);
pub const L2: LocationId = LocationId::new(2000);

fn node(id: LocationId, kind: LocationKind, name: &str, parent_id: Option<LocationId>) -> LocationNode {
    LocationNode {
        id,
        kind,
        name: String::from(name),
        parent_id,
    }
}

pub fn create_test_nodes() -> Vec<LocationNode> {
    vec![
        node(R1, LocationKind::Region, "Region I", None),
        node(R2, LocationKind::Region, "Region II", None),
        node(C1, LocationKind::City, "San Fernando", Some(R1)),
        node(C3, LocationKind::City, "Agoo", Some(R1)),
        node(C2, LocationKind::City, "Tuguegarao", Some(R2)),
        node(B1, LocationKind::Barangay, "Catbangen", Some(C1)),
        node(B2, LocationKind::Barangay, "Ugac Norte", Some(C2)),
        node(L1, LocationKind::Location, "Purok 1", Some(B1)),
        node(L2, LocationKind::Location, "Purok 7", Some(B2)),
    ]
}

pub fn create_test_hierarchy() -> LocationHierarchy {
    LocationHierarchy::from_nodes(create_test_nodes()).expect("test hierarchy is consistent")
}

pub fn consistent_path() -> LocationPath {
    LocationPath::new(Some(R1), Some(C1), Some(B1), Some(L1))
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

pub fn base_fields() -> JobOrderFields {
    JobOrderFields {
        plan: Some(String::from("Fiber 50")),
        group_assignment: Some(String::from("Team North")),
        location: consistent_path(),
        ..JobOrderFields::default()
    }
}

pub fn in_progress_candidate() -> JobOrderCandidate {
    JobOrderCandidate {
        status: JobOrderStatus::InProgress,
        fields: base_fields(),
        customer: create_test_customer(),
        media: MediaSet::new(),
        items: Vec::new(),
    }
}

pub fn failed_candidate() -> JobOrderCandidate {
    let mut candidate: JobOrderCandidate = in_progress_candidate();
    candidate.status = JobOrderStatus::Failed;
    candidate.fields.visit_by = Some(String::from("Juan"));
    candidate.fields.visit_with = Some(String::from("Pedro"));
    candidate.fields.visit_with_other = Some(String::from("None"));
    candidate.fields.onsite_remarks = Some(String::from("Customer not home"));
    candidate.fields.status_remarks = Some(String::from("No access to premises"));
    candidate
}

pub fn test_image(name: &str) -> MediaFile {
    MediaFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

/// A complete `Done` candidate for `connection_type`, including the
/// technology-specific fields of every connection type.
pub fn done_candidate(connection_type: ConnectionType) -> JobOrderCandidate {
    let mut candidate: JobOrderCandidate = in_progress_candidate();
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
            MediaCapture::Existing(MediaRef::new("media/port-label.jpg")),
        );
    }

    candidate.items = vec![
        ItemLine::new("Drop cable (m)", 120),
        ItemLine::new("F-connector", 2),
    ];
    candidate
}
