// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fieldops_audit::AuditEvent;
use tracing::debug;

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event and returns it with its assigned id.
///
/// Callers writing the job order in the same unit of work run this inside
/// their transaction.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<AuditEvent, PersistenceError> {
    let actor_data: ActorData = ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    };
    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };
    let action_data: ActionData = ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    };
    let before_data: StateSnapshotData = StateSnapshotData {
        data: event.before.data.clone(),
    };
    let after_data: StateSnapshotData = StateSnapshotData {
        data: event.after.data.clone(),
    };

    let event_id: i64 = diesel::insert_into(audit_events::table)
        .values((
            audit_events::job_order_id.eq(event.job_order_id.value()),
            audit_events::actor_json.eq(serde_json::to_string(&actor_data)?),
            audit_events::cause_json.eq(serde_json::to_string(&cause_data)?),
            audit_events::action_json.eq(serde_json::to_string(&action_data)?),
            audit_events::before_snapshot_json.eq(serde_json::to_string(&before_data)?),
            audit_events::after_snapshot_json.eq(serde_json::to_string(&after_data)?),
        ))
        .returning(audit_events::event_id)
        .get_result(conn)?;

    debug!(
        event_id,
        job_order_id = %event.job_order_id,
        action = %event.action.name,
        "Persisted audit event"
    );
    Ok(event.clone().with_event_id(event_id))
}
