//! JSON payload handlers behind the HTTP routes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::combat::Simulation;
use crate::data::build::parse_build;
use crate::data::validate::validate_build;

/// One run at a time: a simulate request while another is active is refused
/// instead of queued, mirroring the driver's no-op start guard.
static RUN_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn health_payload() -> Result<String, serde_json::Error> {
    let body = serde_json::json!({
        "status": "ok",
        "service": "rotasim",
        "version": env!("CARGO_PKG_VERSION"),
        "generated_at": chrono::Utc::now().to_rfc3339(),
    });
    serde_json::to_string_pretty(&body)
}

#[derive(Debug)]
pub enum SimulateError {
    Parse(String),
    Validation(Vec<String>),
    Busy,
}

impl fmt::Display for SimulateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulateError::Parse(message) => write!(f, "invalid request body: {message}"),
            SimulateError::Validation(issues) => {
                write!(f, "build validation failed: {}", issues.join("; "))
            }
            SimulateError::Busy => write!(f, "a simulation is already running"),
        }
    }
}

/// POST /api/simulate: body is a build JSON, optionally wrapped with a
/// seed: `{"build": {...}, "seed": 7}`. Returns the final aggregates.
pub fn simulate_payload(body: &str) -> Result<String, SimulateError> {
    let (build_raw, seed) = split_seed(body)?;
    let build = parse_build(&build_raw).map_err(|err| SimulateError::Parse(err.to_string()))?;

    let report = validate_build(&build);
    if report.has_errors() {
        return Err(SimulateError::Validation(
            report.errors().map(|diag| diag.to_string()).collect(),
        ));
    }

    if RUN_ACTIVE.swap(true, Ordering::SeqCst) {
        return Err(SimulateError::Busy);
    }
    let outcome = (|| {
        let mut simulation = Simulation::new(&build, seed)
            .map_err(|err| SimulateError::Validation(vec![err.to_string()]))?;
        let summary = simulation.run();
        let payload = serde_json::json!({
            "status": "ok",
            "summary": summary,
            "log": if simulation.log().is_enabled() {
                Some(simulation.log().render_text())
            } else {
                None
            },
        });
        serde_json::to_string_pretty(&payload)
            .map_err(|err| SimulateError::Parse(err.to_string()))
    })();
    RUN_ACTIVE.store(false, Ordering::SeqCst);
    outcome
}

/// POST /api/validate: body is a build JSON; returns the full diagnostic
/// report without running anything.
pub fn validate_payload(body: &str) -> Result<String, SimulateError> {
    let build = parse_build(body).map_err(|err| SimulateError::Parse(err.to_string()))?;
    let report = validate_build(&build);
    let diagnostics: Vec<_> = report
        .diagnostics
        .iter()
        .map(|diag| {
            serde_json::json!({
                "severity": diag.severity.as_str(),
                "context": diag.context,
                "message": diag.message,
            })
        })
        .collect();
    let payload = serde_json::json!({
        "status": if report.has_errors() { "invalid" } else { "ok" },
        "diagnostics": diagnostics,
    });
    serde_json::to_string_pretty(&payload).map_err(|err| SimulateError::Parse(err.to_string()))
}

/// Accept either a bare build or `{"build": ..., "seed": ...}`.
fn split_seed(body: &str) -> Result<(String, Option<u64>), SimulateError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|err| SimulateError::Parse(err.to_string()))?;
    if let Some(build) = value.get("build") {
        let seed = value.get("seed").and_then(|seed| seed.as_u64());
        return Ok((build.to_string(), seed));
    }
    Ok((body.to_string(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build::sample_build;

    #[test]
    fn health_reports_service_name() {
        let payload = health_payload().unwrap();
        assert!(payload.contains("rotasim"));
        assert!(payload.contains("generated_at"));
    }

    #[test]
    fn simulate_rejects_malformed_body() {
        let err = simulate_payload("not json").unwrap_err();
        assert!(matches!(err, SimulateError::Parse(_)));
    }

    #[test]
    fn simulate_rejects_invalid_build_with_diagnostics() {
        let mut build = sample_build();
        build.targets = 0;
        let body = serde_json::to_string(&build).unwrap();
        let err = simulate_payload(&body).unwrap_err();
        match err {
            SimulateError::Validation(issues) => {
                assert!(issues.iter().any(|issue| issue.contains("targets")))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn simulate_runs_wrapped_build_with_seed() {
        let mut build = sample_build();
        build.simulators = 2;
        build.simulation_time_ms = 5_000;
        let body = serde_json::json!({"build": build, "seed": 11}).to_string();
        let payload = simulate_payload(&body).unwrap();
        assert!(payload.contains("\"summary\""));
        assert!(payload.contains("\"dps\""));
    }

    #[test]
    fn validate_reports_without_running() {
        let mut build = sample_build();
        build.abilities[0].rank = 9;
        let body = serde_json::to_string(&build).unwrap();
        let payload = validate_payload(&body).unwrap();
        assert!(payload.contains("\"invalid\""));
        assert!(payload.contains("out of bounds"));
    }
}
