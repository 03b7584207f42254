//! Runs the binary in `--once` mode against a local HTTP server.

mod common;

use common::state_json;
use serde_json::Value;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_m3-office"));
    command
        .env_remove("M3_STATE_URL")
        .env_remove("M3_POLL_INTERVAL_MS")
        .env("M3_SURFACE_SIZE", "128")
        .env("RUST_LOG", "off");
    command
}

#[tokio::test]
async fn test_once_prints_report_and_dumps_screens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/m3-state.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(state_json("coding", Some("coder"), 42.0)),
        )
        .mount(&server)
        .await;
    let dump = tempfile::tempdir().unwrap();

    let output = binary()
        .arg("--once")
        .arg("--url")
        .arg(format!("{}/m3-state.json", server.uri()))
        .arg("--dump-dir")
        .arg(dump.path())
        .output()
        .await
        .expect("Failed to execute binary");

    assert!(output.status.success(), "{:?}", output);

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["snapshot"]["phase"], "coding");
    assert_eq!(report["snapshot"]["progress"], 42.0);
    assert!(report["error"].is_null());

    let workstations = report["workstations"].as_array().unwrap();
    assert_eq!(workstations.len(), 4);
    let coder = workstations
        .iter()
        .find(|station| station["agent"] == "coder")
        .unwrap();
    assert_eq!(coder["status"], "working");
    assert_eq!(coder["is_active"], true);

    for agent in ["organizer", "coder", "verifier", "maestro"] {
        let png = std::fs::read(dump.path().join(format!("{}.png", agent))).unwrap();
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!(image.width(), 128);
        assert_eq!(image.height(), 128);
    }
}

#[tokio::test]
async fn test_once_reports_fetch_failure_and_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/m3-state.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = binary()
        .arg("--once")
        .arg("--url")
        .arg(format!("{}/m3-state.json", server.uri()))
        .output()
        .await
        .expect("Failed to execute binary");

    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["snapshot"]["phase"], "idle");
    assert_eq!(
        report["error"],
        "The state source is failing (server error)."
    );
    assert_eq!(report["workstations"].as_array().unwrap().len(), 4);
}
