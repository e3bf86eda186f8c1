// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job-order workflow engine.
//!
//! [`submit`] decides a transition without side effects;
//! [`CommitOrchestrator`] carries the transition's effects out against the
//! collaborator stores, one job order at a time.

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

mod commit;
mod error;
mod inventory;
mod locks;
mod state;
mod store;
mod workflow;

#[cfg(test)]
mod tests;

pub use commit::{
    CandidateCheck, CommitError, CommitOrchestrator, CommitReport, CommitWarning, StepOutcome,
    StepStatus, Stores,
};
pub use error::CoreError;
pub use inventory::{
    InventoryReconciler, ReconciliationFailure, ReconciliationStage, ReconciliationSummary,
};
pub use locks::JobOrderLocks;
pub use state::{
    ApplicationUpdate, Effect, JobOrderState, JobOrderUpdate, NewJobOrder, Transition,
    application_snapshot, snapshot,
};
pub use store::{
    ApplicationStore, InventoryLedgerStore, JobOrderStore, LookupCatalog, LookupProvider,
    MediaStore, StoreError,
};
pub use workflow::{plan_assignment, submit};
