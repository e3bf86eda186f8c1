// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use diesel::prelude::*;
use fieldops_domain::{
    Application, ApplicationId, ConnectionType, CustomerDetails, ItemLine, JobOrder, JobOrderFields,
    JobOrderId, JobOrderItem, JobOrderStatus, LocationId, LocationKind, LocationNode, LocationPath,
    LookupEntry, MediaRef, MediaSet,
};
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::diesel_schema::{
    applications, audit_events, job_order_items, job_orders, location_nodes, lookup_entries,
};
use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A catalog entry to seed, with the entry it depends on (the LCP/NAP of a
/// port).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub entry: LookupEntry,
    pub parent_id: Option<i64>,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(id: i64, display_name: &str, parent_id: Option<i64>) -> Self {
        Self {
            entry: LookupEntry {
                id,
                display_name: display_name.to_string(),
            },
            parent_id,
        }
    }
}

fn location_id(value: Option<i64>) -> Option<LocationId> {
    value.map(LocationId::new)
}

fn raw_location_id(value: Option<LocationId>) -> Option<i64> {
    value.map(|id| id.value())
}

fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, PersistenceError>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid {column} '{value}': {e}"))
    })
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = location_nodes)]
pub struct LocationNodeRow {
    pub node_id: i64,
    pub kind: String,
    pub name: String,
    pub parent_id: Option<i64>,
}

impl LocationNodeRow {
    pub fn into_node(self) -> Result<LocationNode, PersistenceError> {
        Ok(LocationNode {
            id: LocationId::new(self.node_id),
            kind: parse_column::<LocationKind>("location kind", &self.kind)?,
            name: self.name,
            parent_id: location_id(self.parent_id),
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = lookup_entries)]
pub struct LookupEntryRow {
    pub entry_id: i64,
    pub display_name: String,
}

impl From<LookupEntryRow> for LookupEntry {
    fn from(row: LookupEntryRow) -> Self {
        Self {
            id: row.entry_id,
            display_name: row.display_name,
        }
    }
}

/// Column values shared by application inserts and updates.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = applications)]
#[diesel(treat_none_as_null = true)]
pub struct ApplicationValues {
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub mobile_number: String,
    pub secondary_mobile_number: Option<String>,
    pub email: Option<String>,
    pub installation_address: String,
    pub region_id: Option<i64>,
    pub city_id: Option<i64>,
    pub barangay_id: Option<i64>,
    pub location_id: Option<i64>,
    pub plan: Option<String>,
    pub promo: Option<String>,
}

impl ApplicationValues {
    pub fn new(
        customer: &CustomerDetails,
        location: &LocationPath,
        plan: Option<&str>,
        promo: Option<&str>,
    ) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            middle_initial: customer.middle_initial.clone(),
            last_name: customer.last_name.clone(),
            mobile_number: customer.mobile_number.clone(),
            secondary_mobile_number: customer.secondary_mobile_number.clone(),
            email: customer.email.clone(),
            installation_address: customer.installation_address.clone(),
            region_id: raw_location_id(location.region),
            city_id: raw_location_id(location.city),
            barangay_id: raw_location_id(location.barangay),
            location_id: raw_location_id(location.location),
            plan: plan.map(str::to_string),
            promo: promo.map(str::to_string),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = applications)]
pub struct ApplicationRow {
    pub application_id: i64,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub mobile_number: String,
    pub secondary_mobile_number: Option<String>,
    pub email: Option<String>,
    pub installation_address: String,
    pub region_id: Option<i64>,
    pub city_id: Option<i64>,
    pub barangay_id: Option<i64>,
    pub location_id: Option<i64>,
    pub plan: Option<String>,
    pub promo: Option<String>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: ApplicationId::new(row.application_id),
            customer: CustomerDetails {
                first_name: row.first_name,
                middle_initial: row.middle_initial,
                last_name: row.last_name,
                mobile_number: row.mobile_number,
                secondary_mobile_number: row.secondary_mobile_number,
                email: row.email,
                installation_address: row.installation_address,
            },
            location: LocationPath::new(
                location_id(row.region_id),
                location_id(row.city_id),
                location_id(row.barangay_id),
                location_id(row.location_id),
            ),
            plan: row.plan,
            promo: row.promo,
        }
    }
}

/// Column values shared by job-order inserts and updates.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = job_orders)]
#[diesel(treat_none_as_null = true)]
pub struct JobOrderValues {
    pub status: String,
    pub plan: Option<String>,
    pub promo: Option<String>,
    pub group_assignment: Option<String>,
    pub region_id: Option<i64>,
    pub city_id: Option<i64>,
    pub barangay_id: Option<i64>,
    pub location_id: Option<i64>,
    pub date_installed: Option<String>,
    pub usage_type: Option<String>,
    pub connection_type: Option<String>,
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
    pub address_coordinates: Option<String>,
    pub media_json: String,
    pub accepted_items_json: String,
}

impl JobOrderValues {
    pub fn new(
        status: JobOrderStatus,
        fields: &JobOrderFields,
        media: &MediaSet<MediaRef>,
        accepted_items: &[ItemLine],
    ) -> Result<Self, PersistenceError> {
        let date_installed: Option<String> = fields
            .date_installed
            .map(|date| date.format(DATE_FORMAT))
            .transpose()
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        Ok(Self {
            status: status.as_str().to_string(),
            plan: fields.plan.clone(),
            promo: fields.promo.clone(),
            group_assignment: fields.group_assignment.clone(),
            region_id: raw_location_id(fields.location.region),
            city_id: raw_location_id(fields.location.city),
            barangay_id: raw_location_id(fields.location.barangay),
            location_id: raw_location_id(fields.location.location),
            date_installed,
            usage_type: fields.usage_type.clone(),
            connection_type: fields
                .connection_type
                .map(|connection| connection.as_str().to_string()),
            router_model: fields.router_model.clone(),
            modem_serial: fields.modem_serial.clone(),
            ip: fields.ip.clone(),
            lcp_nap: fields.lcp_nap.clone(),
            port: fields.port.clone(),
            vlan: fields.vlan.clone(),
            visit_by: fields.visit_by.clone(),
            visit_with: fields.visit_with.clone(),
            visit_with_other: fields.visit_with_other.clone(),
            onsite_remarks: fields.onsite_remarks.clone(),
            status_remarks: fields.status_remarks.clone(),
            address_coordinates: fields.address_coordinates.clone(),
            media_json: serde_json::to_string(media)?,
            accepted_items_json: serde_json::to_string(accepted_items)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = job_orders)]
pub struct JobOrderRow {
    pub job_order_id: i64,
    pub application_id: i64,
    pub status: String,
    pub plan: Option<String>,
    pub promo: Option<String>,
    pub group_assignment: Option<String>,
    pub region_id: Option<i64>,
    pub city_id: Option<i64>,
    pub barangay_id: Option<i64>,
    pub location_id: Option<i64>,
    pub date_installed: Option<String>,
    pub usage_type: Option<String>,
    pub connection_type: Option<String>,
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
    pub address_coordinates: Option<String>,
    pub media_json: String,
    pub accepted_items_json: String,
}

impl JobOrderRow {
    pub fn into_job_order(self) -> Result<JobOrder, PersistenceError> {
        let date_installed: Option<Date> = self
            .date_installed
            .as_deref()
            .map(|value| {
                Date::parse(value, DATE_FORMAT).map_err(|e| {
                    PersistenceError::ReconstructionError(format!(
                        "Invalid date_installed '{value}': {e}"
                    ))
                })
            })
            .transpose()?;
        let connection_type: Option<ConnectionType> = self
            .connection_type
            .as_deref()
            .map(|value| parse_column::<ConnectionType>("connection type", value))
            .transpose()?;
        let media: MediaSet<MediaRef> = serde_json::from_str(&self.media_json)?;
        let accepted_items: Vec<ItemLine> = serde_json::from_str(&self.accepted_items_json)?;

        Ok(JobOrder {
            id: JobOrderId::new(self.job_order_id),
            application_id: ApplicationId::new(self.application_id),
            status: parse_column::<JobOrderStatus>("status", &self.status)?,
            fields: JobOrderFields {
                plan: self.plan,
                promo: self.promo,
                group_assignment: self.group_assignment,
                location: LocationPath::new(
                    location_id(self.region_id),
                    location_id(self.city_id),
                    location_id(self.barangay_id),
                    location_id(self.location_id),
                ),
                date_installed,
                usage_type: self.usage_type,
                connection_type,
                router_model: self.router_model,
                modem_serial: self.modem_serial,
                ip: self.ip,
                lcp_nap: self.lcp_nap,
                port: self.port,
                vlan: self.vlan,
                visit_by: self.visit_by,
                visit_with: self.visit_with,
                visit_with_other: self.visit_with_other,
                onsite_remarks: self.onsite_remarks,
                status_remarks: self.status_remarks,
                address_coordinates: self.address_coordinates,
            },
            media,
            accepted_items,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = job_order_items)]
pub struct JobOrderItemRow {
    pub job_order_id: i64,
    pub item_name: String,
    pub quantity: i64,
}

impl From<JobOrderItemRow> for JobOrderItem {
    fn from(row: JobOrderItemRow) -> Self {
        Self {
            job_order_id: JobOrderId::new(row.job_order_id),
            item_name: row.item_name,
            quantity: row.quantity,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = job_order_items)]
pub struct NewJobOrderItemRow<'a> {
    pub job_order_id: i64,
    pub item_name: &'a str,
    pub quantity: i64,
}

impl<'a> From<&'a JobOrderItem> for NewJobOrderItemRow<'a> {
    fn from(item: &'a JobOrderItem) -> Self {
        Self {
            job_order_id: item.job_order_id.value(),
            item_name: &item.item_name,
            quantity: item.quantity,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub job_order_id: i64,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}
