// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Required-field rules and candidate checking.
//!
//! [`required_fields`] is a pure function of `(status, connection type)` and
//! knows nothing about how a form is laid out. [`check`] evaluates a
//! candidate against it and also reports values that are present but
//! malformed. It is cheap enough to re-run on every field change and is the
//! authoritative gate at submission.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::candidate::JobOrderCandidate;
use crate::error::DomainError;
use crate::media::{MediaCapture, MediaKind};
use crate::status::{ConnectionType, JobOrderStatus};

/// Identifies a field a submission can be missing or get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Plan,
    GroupAssignment,
    Region,
    City,
    Barangay,
    Location,
    DateInstalled,
    UsageType,
    ConnectionType,
    RouterModel,
    ModemSerial,
    Ip,
    LcpNap,
    Port,
    Vlan,
    VisitBy,
    VisitWith,
    VisitWithOther,
    OnsiteRemarks,
    StatusRemarks,
    AddressCoordinates,
    /// The consumed-inventory lines.
    Items,
    SetupImage,
    BoxReadingImage,
    RouterReadingImage,
    SpeedTestImage,
    SignedContractImage,
    ClientSignatureImage,
    HouseFrontImage,
    PortLabelImage,
    /// Customer email; never required, only format-checked.
    Email,
}

impl FieldId {
    pub const ALL: [Self; 31] = [
        Self::Plan,
        Self::GroupAssignment,
        Self::Region,
        Self::City,
        Self::Barangay,
        Self::Location,
        Self::DateInstalled,
        Self::UsageType,
        Self::ConnectionType,
        Self::RouterModel,
        Self::ModemSerial,
        Self::Ip,
        Self::LcpNap,
        Self::Port,
        Self::Vlan,
        Self::VisitBy,
        Self::VisitWith,
        Self::VisitWithOther,
        Self::OnsiteRemarks,
        Self::StatusRemarks,
        Self::AddressCoordinates,
        Self::Items,
        Self::SetupImage,
        Self::BoxReadingImage,
        Self::RouterReadingImage,
        Self::SpeedTestImage,
        Self::SignedContractImage,
        Self::ClientSignatureImage,
        Self::HouseFrontImage,
        Self::PortLabelImage,
        Self::Email,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::GroupAssignment => "group_assignment",
            Self::Region => "region",
            Self::City => "city",
            Self::Barangay => "barangay",
            Self::Location => "location",
            Self::DateInstalled => "date_installed",
            Self::UsageType => "usage_type",
            Self::ConnectionType => "connection_type",
            Self::RouterModel => "router_model",
            Self::ModemSerial => "modem_serial",
            Self::Ip => "ip",
            Self::LcpNap => "lcp_nap",
            Self::Port => "port",
            Self::Vlan => "vlan",
            Self::VisitBy => "visit_by",
            Self::VisitWith => "visit_with",
            Self::VisitWithOther => "visit_with_other",
            Self::OnsiteRemarks => "onsite_remarks",
            Self::StatusRemarks => "status_remarks",
            Self::AddressCoordinates => "address_coordinates",
            Self::Items => "items",
            Self::SetupImage => "setup_image",
            Self::BoxReadingImage => "box_reading_image",
            Self::RouterReadingImage => "router_reading_image",
            Self::SpeedTestImage => "speed_test_image",
            Self::SignedContractImage => "signed_contract_image",
            Self::ClientSignatureImage => "client_signature_image",
            Self::HouseFrontImage => "house_front_image",
            Self::PortLabelImage => "port_label_image",
            Self::Email => "email",
        }
    }

    /// The media slot this field stands for, if any.
    #[must_use]
    pub const fn media_kind(&self) -> Option<MediaKind> {
        match self {
            Self::SetupImage => Some(MediaKind::SetupImage),
            Self::BoxReadingImage => Some(MediaKind::BoxReadingImage),
            Self::RouterReadingImage => Some(MediaKind::RouterReadingImage),
            Self::SpeedTestImage => Some(MediaKind::SpeedTestImage),
            Self::SignedContractImage => Some(MediaKind::SignedContractImage),
            Self::ClientSignatureImage => Some(MediaKind::ClientSignatureImage),
            Self::HouseFrontImage => Some(MediaKind::HouseFrontImage),
            Self::PortLabelImage => Some(MediaKind::PortLabelImage),
            _ => None,
        }
    }
}

impl From<MediaKind> for FieldId {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::SetupImage => Self::SetupImage,
            MediaKind::BoxReadingImage => Self::BoxReadingImage,
            MediaKind::RouterReadingImage => Self::RouterReadingImage,
            MediaKind::SpeedTestImage => Self::SpeedTestImage,
            MediaKind::SignedContractImage => Self::SignedContractImage,
            MediaKind::ClientSignatureImage => Self::ClientSignatureImage,
            MediaKind::HouseFrontImage => Self::HouseFrontImage,
            MediaKind::PortLabelImage => Self::PortLabelImage,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| DomainError::InvalidFieldId {
                value: s.to_string(),
            })
    }
}

/// Fields required for every status.
pub const BASE_FIELDS: [FieldId; 6] = [
    FieldId::Plan,
    FieldId::GroupAssignment,
    FieldId::Region,
    FieldId::City,
    FieldId::Barangay,
    FieldId::Location,
];

const VISIT_FIELDS: [FieldId; 4] = [
    FieldId::VisitBy,
    FieldId::VisitWith,
    FieldId::VisitWithOther,
    FieldId::OnsiteRemarks,
];

const DONE_FIELDS: [FieldId; 7] = [
    FieldId::DateInstalled,
    FieldId::UsageType,
    FieldId::ConnectionType,
    FieldId::RouterModel,
    FieldId::ModemSerial,
    FieldId::AddressCoordinates,
    FieldId::Items,
];

/// Returns the fields a candidate must carry to enter `status`.
///
/// The connection type only matters for `Done`; with no connection type
/// selected only the technology-independent fields are listed (the
/// connection type itself is then missing).
#[must_use]
pub fn required_fields(
    status: JobOrderStatus,
    connection_type: Option<ConnectionType>,
) -> BTreeSet<FieldId> {
    let mut required: BTreeSet<FieldId> = BASE_FIELDS.into_iter().collect();

    match status {
        JobOrderStatus::InProgress => {}
        JobOrderStatus::Failed | JobOrderStatus::Reschedule => {
            required.extend(VISIT_FIELDS);
            required.insert(FieldId::StatusRemarks);
        }
        JobOrderStatus::Done => {
            required.extend(VISIT_FIELDS);
            required.extend(DONE_FIELDS);
            required.extend(MediaKind::STANDARD.into_iter().map(FieldId::from));
            match connection_type {
                Some(ConnectionType::Antenna) => {
                    required.insert(FieldId::Ip);
                    required.insert(FieldId::PortLabelImage);
                }
                Some(ConnectionType::Fiber) => {
                    required.extend([FieldId::LcpNap, FieldId::Port, FieldId::Vlan]);
                }
                Some(ConnectionType::Local) => {
                    required.insert(FieldId::PortLabelImage);
                }
                None => {}
            }
        }
    }

    required
}

/// Checks a candidate against the rules for its target status.
///
/// Returns every required field that is missing plus every present field
/// whose value is malformed. An empty set means the candidate is
/// submittable.
#[must_use]
pub fn check(candidate: &JobOrderCandidate) -> BTreeSet<FieldId> {
    let required: BTreeSet<FieldId> =
        required_fields(candidate.status, candidate.fields.connection_type);

    let mut problems: BTreeSet<FieldId> = required
        .into_iter()
        .filter(|field| !is_present(candidate, *field))
        .collect();

    problems.extend(malformed_fields(candidate));
    problems
}

fn is_filled(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn is_present(candidate: &JobOrderCandidate, field: FieldId) -> bool {
    let fields = &candidate.fields;
    match field {
        FieldId::Plan => is_filled(fields.plan.as_ref()),
        FieldId::GroupAssignment => is_filled(fields.group_assignment.as_ref()),
        FieldId::Region => fields.location.region.is_some(),
        FieldId::City => fields.location.city.is_some(),
        FieldId::Barangay => fields.location.barangay.is_some(),
        FieldId::Location => fields.location.location.is_some(),
        FieldId::DateInstalled => fields.date_installed.is_some(),
        FieldId::UsageType => is_filled(fields.usage_type.as_ref()),
        FieldId::ConnectionType => fields.connection_type.is_some(),
        FieldId::RouterModel => is_filled(fields.router_model.as_ref()),
        FieldId::ModemSerial => is_filled(fields.modem_serial.as_ref()),
        FieldId::Ip => is_filled(fields.ip.as_ref()),
        FieldId::LcpNap => is_filled(fields.lcp_nap.as_ref()),
        FieldId::Port => is_filled(fields.port.as_ref()),
        FieldId::Vlan => is_filled(fields.vlan.as_ref()),
        FieldId::VisitBy => is_filled(fields.visit_by.as_ref()),
        FieldId::VisitWith => is_filled(fields.visit_with.as_ref()),
        FieldId::VisitWithOther => is_filled(fields.visit_with_other.as_ref()),
        FieldId::OnsiteRemarks => is_filled(fields.onsite_remarks.as_ref()),
        FieldId::StatusRemarks => is_filled(fields.status_remarks.as_ref()),
        FieldId::AddressCoordinates => is_filled(fields.address_coordinates.as_ref()),
        FieldId::Items => candidate.items.iter().any(|line| line.quantity > 0),
        FieldId::Email => is_filled(candidate.customer.email.as_ref()),
        media_field => media_field
            .media_kind()
            .and_then(|kind| candidate.media.get(kind))
            .is_some_and(|capture| match capture {
                MediaCapture::Existing(reference) => !reference.as_str().trim().is_empty(),
                MediaCapture::Attached(file) => !file.is_empty(),
            }),
    }
}

fn malformed_fields(candidate: &JobOrderCandidate) -> Vec<FieldId> {
    let fields = &candidate.fields;
    let mut malformed: Vec<FieldId> = Vec::new();

    if filled(fields.ip.as_ref()).is_some_and(|ip| ip.parse::<Ipv4Addr>().is_err()) {
        malformed.push(FieldId::Ip);
    }

    if filled(fields.address_coordinates.as_ref()).is_some_and(|c| parse_coordinates(c).is_none())
    {
        malformed.push(FieldId::AddressCoordinates);
    }

    if candidate.items.iter().any(|line| !line.is_valid()) {
        malformed.push(FieldId::Items);
    }

    if filled(candidate.customer.email.as_ref()).is_some_and(|email| !is_valid_email(email)) {
        malformed.push(FieldId::Email);
    }

    malformed
}

fn filled(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parses `"lat,lng"` and checks both are within geographic range.
fn parse_coordinates(value: &str) -> Option<(f64, f64)> {
    let (lat, lng) = value.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
    in_range.then_some((lat, lng))
}

fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !value.contains(char::is_whitespace)
        }
        _ => false,
    }
}
