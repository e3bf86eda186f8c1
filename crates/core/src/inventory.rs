// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_domain::{ItemLine, JobOrderId, JobOrderItem};
use std::fmt;
use tracing::{debug, warn};

use crate::store::{InventoryLedgerStore, StoreError};

/// How far a failed reconciliation got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationStage {
    /// Deleting the previous lines failed; the ledger is unchanged.
    ItemsNotCleared,
    /// The previous lines are gone but the new ones were not written.
    ItemsClearedReinsertionFailed,
}

impl ReconciliationStage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ItemsNotCleared => "items not cleared",
            Self::ItemsClearedReinsertionFailed => "items cleared, reinsertion failed",
        }
    }
}

impl fmt::Display for ReconciliationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reconciliation that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationFailure {
    pub stage: ReconciliationStage,
    pub source: StoreError,
}

/// Counts of a completed reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationSummary {
    pub removed: usize,
    pub inserted: usize,
}

/// Replaces the consumed-inventory lines of a job order.
///
/// Delete-then-insert keyed by job order id. Running it again with the same
/// lines converges to the same ledger, so a failed run is simply retried.
pub struct InventoryReconciler<'a> {
    ledger: &'a dyn InventoryLedgerStore,
}

impl<'a> InventoryReconciler<'a> {
    #[must_use]
    pub const fn new(ledger: &'a dyn InventoryLedgerStore) -> Self {
        Self { ledger }
    }

    /// Makes `lines` the complete ledger of `job_order_id`.
    ///
    /// # Errors
    ///
    /// Returns the stage at which the ledger write stopped.
    pub fn reconcile(
        &self,
        job_order_id: JobOrderId,
        lines: &[ItemLine],
    ) -> Result<ReconciliationSummary, ReconciliationFailure> {
        let removed: usize = self.ledger.delete_items_of(job_order_id).map_err(|source| {
            warn!(job_order_id = %job_order_id, error = %source, "Failed to clear inventory lines");
            ReconciliationFailure {
                stage: ReconciliationStage::ItemsNotCleared,
                source,
            }
        })?;

        let items: Vec<JobOrderItem> = lines
            .iter()
            .map(|line| JobOrderItem::from_line(job_order_id, line))
            .collect();

        if !items.is_empty() {
            self.ledger.insert_items(&items).map_err(|source| {
                warn!(
                    job_order_id = %job_order_id,
                    removed,
                    error = %source,
                    "Inventory lines cleared but reinsertion failed"
                );
                ReconciliationFailure {
                    stage: ReconciliationStage::ItemsClearedReinsertionFailed,
                    source,
                }
            })?;
        }

        debug!(
            job_order_id = %job_order_id,
            removed,
            inserted = items.len(),
            "Reconciled inventory lines"
        );
        Ok(ReconciliationSummary {
            removed,
            inserted: items.len(),
        })
    }
}
