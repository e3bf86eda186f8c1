// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::Date;

use crate::location::LocationPath;
use crate::media::{MediaRef, MediaSet};
use crate::status::{ConnectionType, JobOrderStatus};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Canonical identifier of a job order.
    JobOrderId
);
numeric_id!(
    /// Canonical identifier of a customer application.
    ApplicationId
);
numeric_id!(
    /// Identifier of a node in the location hierarchy.
    LocationId
);

/// Customer identity and contact details carried on an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub mobile_number: String,
    pub secondary_mobile_number: Option<String>,
    pub email: Option<String>,
    pub installation_address: String,
}

/// Denormalized customer record.
///
/// Kept in sync by job-order commits; it is never the source of truth for
/// workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub customer: CustomerDetails,
    /// The currently agreed installation location.
    pub location: LocationPath,
    pub plan: Option<String>,
    pub promo: Option<String>,
}

/// The editable field set of a job order.
///
/// The same struct is carried by the persisted [`JobOrder`] and by a
/// submission candidate, so "identical field values" is plain equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrderFields {
    pub plan: Option<String>,
    pub promo: Option<String>,
    pub group_assignment: Option<String>,
    pub location: LocationPath,
    pub date_installed: Option<Date>,
    pub usage_type: Option<String>,
    pub connection_type: Option<ConnectionType>,
    pub router_model: Option<String>,
    pub modem_serial: Option<String>,
    pub ip: Option<String>,
    pub lcp_nap: Option<String>,
    pub port: Option<String>,
    pub vlan: Option<String>,
    pub visit_by: Option<String>,
    pub visit_with: Option<String>,
    pub visit_with_other: Option<String>,
    pub onsite_remarks: Option<String>,
    pub status_remarks: Option<String>,
    /// "lat,lng" of the installation site.
    pub address_coordinates: Option<String>,
}

/// A persisted job order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrder {
    pub id: JobOrderId,
    pub application_id: ApplicationId,
    pub status: JobOrderStatus,
    pub fields: JobOrderFields,
    /// Durable references of the captures accepted so far.
    pub media: MediaSet<MediaRef>,
    /// Inventory lines accepted with the `Done` transition. The ledger is
    /// reconciled against these.
    #[serde(default)]
    pub accepted_items: Vec<ItemLine>,
}

/// A consumed-inventory line as submitted (not yet bound to a job order).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemLine {
    pub item_name: String,
    pub quantity: i64,
}

impl ItemLine {
    #[must_use]
    pub fn new(item_name: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
        }
    }

    /// A line is usable when it names an item and consumes at least one unit.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.item_name.trim().is_empty() && self.quantity > 0
    }
}

/// A consumed-inventory line owned by a job order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrderItem {
    pub job_order_id: JobOrderId,
    pub item_name: String,
    pub quantity: i64,
}

impl JobOrderItem {
    #[must_use]
    pub fn from_line(job_order_id: JobOrderId, line: &ItemLine) -> Self {
        Self {
            job_order_id,
            item_name: line.item_name.clone(),
            quantity: line.quantity,
        }
    }

    #[must_use]
    pub fn to_line(&self) -> ItemLine {
        ItemLine::new(self.item_name.clone(), self.quantity)
    }
}

/// One row of a lookup catalog (plans, groups, VLANs, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: i64,
    pub display_name: String,
}
