// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_domain::{ApplicationId, DomainError, JobOrderId, JobOrderStatus};
use thiserror::Error;

/// Errors raised while deciding a transition. None of them touch a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The application supplied with a job order is not the one it links to.
    #[error("Job order {job_order_id} belongs to application {expected}, not {actual}")]
    ApplicationMismatch {
        job_order_id: JobOrderId,
        expected: ApplicationId,
        actual: ApplicationId,
    },
    /// Inventory lines are only reconciled for completed installations.
    #[error("Job order {job_order_id} is {status}; inventory is only reconciled for done job orders")]
    ReconciliationNotApplicable {
        job_order_id: JobOrderId,
        status: JobOrderStatus,
    },
}
