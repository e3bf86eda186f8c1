// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::media::{MediaCapture, MediaSet};
use crate::status::JobOrderStatus;
use crate::types::{CustomerDetails, ItemLine, JobOrder, JobOrderFields, LocationId};

/// The in-progress edit of a job order, as submitted by an operator.
///
/// Carries the target status, the job-order field values, the customer
/// identity that is synchronized back to the application, the media slots,
/// and the consumed-inventory lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOrderCandidate {
    pub status: JobOrderStatus,
    pub fields: JobOrderFields,
    pub customer: CustomerDetails,
    pub media: MediaSet<MediaCapture>,
    pub items: Vec<ItemLine>,
}

impl JobOrderCandidate {
    /// Starts an edit from the persisted job order, keeping its media refs.
    #[must_use]
    pub fn from_job_order(
        job_order: &JobOrder,
        customer: CustomerDetails,
        items: Vec<ItemLine>,
    ) -> Self {
        Self {
            status: job_order.status,
            fields: job_order.fields.clone(),
            customer,
            media: MediaSet::from(&job_order.media),
            items,
        }
    }

    pub fn select_region(&mut self, id: Option<LocationId>) {
        self.fields.location.select_region(id);
    }

    pub fn select_city(&mut self, id: Option<LocationId>) {
        self.fields.location.select_city(id);
    }

    pub fn select_barangay(&mut self, id: Option<LocationId>) {
        self.fields.location.select_barangay(id);
    }

    pub fn select_location(&mut self, id: Option<LocationId>) {
        self.fields.location.select_location(id);
    }
}
