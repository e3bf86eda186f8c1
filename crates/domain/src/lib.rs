// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain model for field-service job orders.
//!
//! Everything in this crate is pure: no I/O, no clocks, no stores. The
//! workflow engine in the core crate composes these pieces:
//!
//! - [`LocationHierarchy`] resolves region → city → barangay → location chains
//! - [`required_fields`] / [`check`] decide whether a candidate is submittable
//! - [`JobOrderStatus::validate_transition`] owns the status lifecycle

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod candidate;
mod error;
mod location;
mod media;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use candidate::JobOrderCandidate;
pub use error::DomainError;
pub use location::{LocationHierarchy, LocationKind, LocationNode, LocationPath};
pub use media::{MediaCapture, MediaFile, MediaKind, MediaRef, MediaSet};
pub use status::{ConnectionType, JobOrderStatus};
pub use types::{
    Application, ApplicationId, CustomerDetails, ItemLine, JobOrder, JobOrderFields, JobOrderId,
    JobOrderItem, LocationId, LookupEntry,
};
pub use validation::{BASE_FIELDS, FieldId, check, required_fields};
