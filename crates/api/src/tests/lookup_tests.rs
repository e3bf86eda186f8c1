// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, ListLocationNodesResponse, ListLookupResponse, RequiredFieldsResponse,
    get_required_fields, list_barangays, list_catalog, list_cities, list_location_nodes,
    list_locations, list_ports, list_regions,
};

use super::helpers::{B1, C1, R1, TestApi, create_test_api};

fn names(response: &ListLookupResponse) -> Vec<&str> {
    response
        .entries
        .iter()
        .map(|entry| entry.display_name.as_str())
        .collect()
}

#[test]
fn test_location_levels_follow_the_hierarchy() {
    let api: TestApi = create_test_api();

    let regions: ListLookupResponse = list_regions(&api.orchestrator).unwrap();
    let cities: ListLookupResponse = list_cities(&api.orchestrator, R1).unwrap();
    let barangays: ListLookupResponse = list_barangays(&api.orchestrator, C1).unwrap();
    let locations: ListLookupResponse = list_locations(&api.orchestrator, B1).unwrap();

    assert_eq!(names(&regions), vec!["Region I", "Region II"]);
    assert_eq!(names(&cities), vec!["San Fernando"]);
    assert_eq!(cities.parent_id, Some(R1));
    assert_eq!(names(&barangays), vec!["Catbangen"]);
    assert_eq!(names(&locations), vec!["Purok 1"]);
}

#[test]
fn test_unknown_parent_lists_nothing() {
    let api: TestApi = create_test_api();

    let cities: ListLookupResponse = list_cities(&api.orchestrator, 999).unwrap();

    assert!(cities.entries.is_empty());
}

#[test]
fn test_location_nodes_are_listed_whole() {
    let api: TestApi = create_test_api();

    let response: ListLocationNodesResponse = list_location_nodes(&api.orchestrator).unwrap();

    assert_eq!(response.nodes.len(), 8);
    assert!(
        response
            .nodes
            .iter()
            .any(|node| node.kind == "barangay" && node.parent_id == Some(C1))
    );
}

#[test]
fn test_catalog_by_name() {
    let api: TestApi = create_test_api();

    let plans: ListLookupResponse = list_catalog(&api.orchestrator, "plans").unwrap();
    let vlans: ListLookupResponse = list_catalog(&api.orchestrator, "vlans").unwrap();

    assert_eq!(plans.catalog, "plans");
    assert_eq!(names(&plans), vec!["Fiber 100", "Fiber 50"]);
    assert!(vlans.entries.is_empty());
}

#[test]
fn test_unknown_catalog_is_invalid_input() {
    let api: TestApi = create_test_api();

    let result: Result<ListLookupResponse, ApiError> = list_catalog(&api.orchestrator, "modems");

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "catalog"));
}

#[test]
fn test_ports_require_an_lcp_nap() {
    let api: TestApi = create_test_api();

    let flat: Result<ListLookupResponse, ApiError> = list_catalog(&api.orchestrator, "ports");
    let ports: ListLookupResponse = list_ports(&api.orchestrator, 7).unwrap();

    assert!(flat.is_err());
    assert_eq!(names(&ports), vec!["Port 1", "Port 2"]);
    assert_eq!(ports.parent_id, Some(7));
}

#[test]
fn test_required_fields_depend_on_connection_type() {
    let fiber: RequiredFieldsResponse = get_required_fields("done", Some("fiber")).unwrap();
    let antenna: RequiredFieldsResponse = get_required_fields("done", Some("antenna")).unwrap();

    assert!(fiber.fields.iter().any(|f| f == "lcp_nap"));
    assert!(!fiber.fields.iter().any(|f| f == "ip"));
    assert!(antenna.fields.iter().any(|f| f == "port_label_image"));
}

#[test]
fn test_required_fields_rejects_unknown_status() {
    let result: Result<RequiredFieldsResponse, ApiError> = get_required_fields("closed", None);

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "status"));
}
