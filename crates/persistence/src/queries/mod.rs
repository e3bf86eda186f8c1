// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `catalog`: location nodes and lookup catalogs
//! - `applications`: customer applications
//! - `job_orders`: job order records
//! - `inventory`: consumed-inventory lines
//! - `audit`: audit events and per-job-order timelines

pub mod applications;
pub mod audit;
pub mod catalog;
pub mod inventory;
pub mod job_orders;
