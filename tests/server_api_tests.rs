//! Route-level tests for the local API server.

use rotasim::data::build::sample_build;
use rotasim::server::routes::route_request;

#[test]
fn index_serves_the_console_page() {
    let response = route_request("GET", "/", "");
    assert_eq!(response.status_code, 200);
    assert!(response.body.contains("rotasim"));
}

#[test]
fn health_endpoint_reports_ok() {
    let response = route_request("GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert!(response.body.contains("\"status\": \"ok\""));
}

#[test]
fn simulate_endpoint_runs_a_seeded_build() {
    let mut build = sample_build();
    build.simulators = 2;
    build.simulation_time_ms = 5_000;
    let body = serde_json::json!({"build": build, "seed": 3}).to_string();

    let response = route_request("POST", "/api/simulate", &body);
    assert_eq!(response.status_code, 200, "{}", response.body);
    assert!(response.body.contains("\"summary\""));
    assert!(response.body.contains("\"elapsed_ms\": 5000"));
}

#[test]
fn simulate_endpoint_rejects_invalid_builds() {
    let mut build = sample_build();
    build.mitigation = 2.0;
    let body = serde_json::to_string(&build).unwrap();

    let response = route_request("POST", "/api/simulate", &body);
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("mitigation"));
}

#[test]
fn validate_endpoint_lists_diagnostics() {
    let mut build = sample_build();
    build.queue.clear();
    let body = serde_json::to_string(&build).unwrap();

    let response = route_request("POST", "/api/validate", &body);
    assert_eq!(response.status_code, 200);
    assert!(response.body.contains("cast queue is empty"));
}
