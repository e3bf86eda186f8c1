// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `audit`: audit event persistence
//! - `catalog`: seeding of location nodes and lookup catalogs
//! - `applications`: application inserts and synchronization
//! - `job_orders`: job order creation and transition writes
//! - `inventory`: consumed-inventory ledger replacement

pub mod applications;
pub mod audit;
pub mod catalog;
pub mod inventory;
pub mod job_orders;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// Current UTC time in RFC 3339 form for `updated_at` columns.
pub(crate) fn now_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}
