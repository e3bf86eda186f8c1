// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use fieldops_domain::{JobOrder, JobOrderId, LocationNode};

use crate::tests::{create_temp_dir, create_test_nodes};
use crate::{Persistence, PersistenceError};

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = Persistence::new_in_memory().unwrap();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    first.insert_location_nodes(&create_test_nodes()).unwrap();

    assert_eq!(first.list_location_nodes().unwrap().len(), 8);
    assert!(second.list_location_nodes().unwrap().is_empty());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_survives_reopen() {
    let dir: PathBuf = create_temp_dir("db");
    let path: PathBuf = dir.join("fieldops.db");

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .insert_location_nodes(&create_test_nodes())
            .unwrap();
    }
    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let nodes: Vec<LocationNode> = reopened.list_location_nodes().unwrap();

    assert_eq!(nodes.len(), 8);
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_missing_job_order_is_reported_by_id() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<JobOrder, PersistenceError> = persistence.get_job_order(JobOrderId::new(42));

    assert_eq!(result, Err(PersistenceError::JobOrderNotFound(42)));
}
