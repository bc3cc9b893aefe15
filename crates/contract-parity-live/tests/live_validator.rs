// crates/contract-parity-live/tests/live_validator.rs
// ============================================================================
// Module: Live Validator Tests
// Description: Runs the validator against in-process fake backends.
// Purpose: Ensure check sequencing, severities, and the polling ceiling.
// Dependencies: contract-parity-live, contract-parity-config, tiny_http
// ============================================================================
//! ## Overview
//! Each test starts a `tiny_http` server on an ephemeral port whose routes
//! are supplied as a closure, then inspects the findings and the requests
//! the validator issued.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

use contract_parity_config::LiveSettings;
use contract_parity_core::RunReport;
use contract_parity_live::JobPollOutcome;
use contract_parity_live::LiveValidator;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use tiny_http::StatusCode;

// ============================================================================
// SECTION: Fake Backend
// ============================================================================

struct FakeBackend {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeBackend {
    fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &str) -> (u16, String) + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let url = format!("http://{}", server.server_addr());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&requests);
        let stopped = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !stopped.load(Ordering::SeqCst) {
                let Ok(Some(request)) = server.recv_timeout(Duration::from_millis(20)) else {
                    continue;
                };
                let method = request.method().to_string();
                let target = request.url().to_string();
                seen.lock().expect("request log").push(format!("{method} {target}"));
                let path = target.split('?').next().unwrap_or_default().to_string();
                let (status, body) = handler(&method, &path);
                let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("header");
                let response =
                    Response::from_string(body).with_status_code(StatusCode(status)).with_header(header);
                let _ = request.respond(response);
            }
        });
        Self {
            url,
            requests,
            stop,
            handle: Some(handle),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn settings(base_url: &str) -> LiveSettings {
    LiveSettings {
        base_url: base_url.to_string(),
        request_timeout_ms: 2_000,
        poll_interval_ms: 10,
        poll_timeout_ms: 300,
        ..LiveSettings::default()
    }
}

fn validator(backend: &FakeBackend) -> LiveValidator {
    LiveValidator::new(&settings(&backend.url)).expect("validator")
}

fn ok(body: &str) -> (u16, String) {
    (200, body.to_string())
}

/// Routes for a backend whose job reports `job_status` on every poll.
fn job_api(method: &str, path: &str, job_status: &str) -> (u16, String) {
    match (method, path) {
        ("GET", "/health") => ok(r#"{"status":"ok","timestamp":"2026-01-01T00:00:00Z"}"#),
        ("GET", "/jobs") => ok(r#"{"jobs":[{"job_id":"older"}]}"#),
        ("POST", "/jobs/demo") => {
            ok(r#"{"job_id":"job-1","status":"pending","message":"Demo job queued"}"#)
        }
        ("GET", "/jobs/job-1/status") => {
            ok(&format!(r#"{{"job_id":"job-1","type":"pipeline","status":"{job_status}"}}"#))
        }
        ("GET", "/jobs/job-1/log") => ok(r#"{"job_id":"job-1","log":["started","loading"]}"#),
        ("GET", "/jobs/job-1/results") => {
            ok(r#"{"algorithm":["InterVA"],"age_group":"neonate","calibrated_csmf":{}}"#)
        }
        ("GET", "/jobs/00000000-0000-0000-0000-000000000000/status") => {
            ok(r#"{"error":"Job not found"}"#)
        }
        _ => (404, r#"{"error":"no route"}"#.to_string()),
    }
}

fn finding_codes(report: &RunReport) -> Vec<&str> {
    report.findings().iter().map(|finding| finding.code.as_str()).collect()
}

// ============================================================================
// SECTION: Run Sequencing
// ============================================================================

#[test]
fn healthy_backend_passes_every_check() {
    let backend = FakeBackend::start(|method, path| job_api(method, path, "completed"));
    let report = validator(&backend).run();
    assert!(report.succeeded(), "{report:?}");
    assert_eq!(report.warnings(), 0, "{report:?}");
    let codes = finding_codes(&report);
    for code in [
        "live.health",
        "live.jobs",
        "live.demo",
        "live.status",
        "live.log",
        "live.job.completed",
        "live.results",
        "live.unknown",
    ] {
        assert!(codes.contains(&code), "missing {code}: {codes:?}");
    }
}

#[test]
fn failing_health_aborts_the_run() {
    let backend = FakeBackend::start(|_, _| (503, r#"{"error":"maintenance"}"#.to_string()));
    let report = validator(&backend).run();
    assert!(report.has_code("live.backend_down"));
    assert_eq!(report.failed(), 2);
    assert_eq!(backend.requests(), vec!["GET /health"]);
}

#[test]
fn unreachable_backend_is_reported_down() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let validator = LiveValidator::new(&settings(&format!("http://{addr}"))).expect("validator");
    let report = validator.run();
    assert!(report.has_code("live.backend_down"));
    assert!(!report.succeeded());
}

#[test]
fn health_status_must_be_ok() {
    let backend = FakeBackend::start(|_, _| ok(r#"{"status":"degraded"}"#));
    let mut report = RunReport::new();
    assert!(!validator(&backend).check_health(&mut report));
    let finding = report.findings().iter().find(|f| f.code == "live.health.status").expect("finding");
    assert_eq!(finding.message, "Health status not 'ok': degraded");
}

#[test]
fn list_jobs_failure_does_not_block_submission() {
    let backend = FakeBackend::start(|method, path| match (method, path) {
        ("GET", "/health") => ok(r#"{"status":"ok"}"#),
        ("GET", "/jobs") => (500, r#"{"error":"boom"}"#.to_string()),
        _ => job_api(method, path, "completed"),
    });
    let report = validator(&backend).run();
    assert!(report.has_code("live.health"));
    assert!(report.has_code("live.health.timestamp"), "missing timestamp warns");
    assert!(report.has_code("live.jobs"));
    assert!(report.has_code("live.demo"));
    assert_eq!(report.failed(), 1);
    assert!(backend.requests().iter().any(|request| request.starts_with("POST /jobs/demo")));
}

#[test]
fn demo_submission_sends_configured_query() {
    let backend = FakeBackend::start(|method, path| job_api(method, path, "completed"));
    let mut report = RunReport::new();
    let job_id = validator(&backend).submit_demo_job(&mut report);
    assert_eq!(job_id.as_deref(), Some("job-1"));
    let requests = backend.requests();
    let demo = requests.iter().find(|request| request.starts_with("POST")).expect("demo request");
    assert!(demo.contains("job_type=pipeline"), "{demo}");
    assert!(demo.contains("algorithm=%5B%22InterVA%22%5D"), "{demo}");
    assert!(demo.contains("age_group=neonate"), "{demo}");
    assert!(demo.contains("calib_model_type=Mmatprior"), "{demo}");
    assert!(demo.contains("ensemble=FALSE"), "{demo}");
}

#[test]
fn demo_response_missing_fields_fails() {
    let backend = FakeBackend::start(|_, _| ok(r#"{"job_id":"job-1"}"#));
    let mut report = RunReport::new();
    assert!(validator(&backend).submit_demo_job(&mut report).is_none());
    let finding = report.findings().iter().find(|f| f.code == "live.demo.fields").expect("finding");
    assert_eq!(finding.details, vec!["status", "message"]);
}

#[test]
fn boxed_scalars_are_unwrapped() {
    let backend = FakeBackend::start(|_, _| {
        ok(r#"{"job_id":["job-9"],"status":["pending"],"message":["queued"]}"#)
    });
    let mut report = RunReport::new();
    let job_id = validator(&backend).submit_demo_job(&mut report);
    assert_eq!(job_id.as_deref(), Some("job-9"));
    assert_eq!(report.warnings(), 0);
}

// ============================================================================
// SECTION: Job Checks
// ============================================================================

#[test]
fn unexpected_job_status_warns() {
    let backend = FakeBackend::start(|method, path| job_api(method, path, "queued"));
    let mut report = RunReport::new();
    assert!(validator(&backend).check_job_status(&mut report, "job-1"));
    assert!(report.has_code("live.status.value"));
    assert!(report.has_code("live.status"));
}

#[test]
fn log_must_be_a_list() {
    let backend = FakeBackend::start(|_, _| ok(r#"{"job_id":"job-1","log":"one line"}"#));
    let mut report = RunReport::new();
    assert!(!validator(&backend).check_job_log(&mut report, "job-1"));
    let finding = report.findings().iter().find(|f| f.code == "live.log.fields").expect("finding");
    assert_eq!(finding.message, "Log field is not a list: string");
}

#[test]
fn polling_times_out_as_warning() {
    let backend = FakeBackend::start(|method, path| job_api(method, path, "running"));
    let validator = validator(&backend);
    let mut report = RunReport::new();
    let started = Instant::now();
    assert_eq!(validator.wait_for_terminal(&mut report, "job-1"), JobPollOutcome::Timeout);
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(started.elapsed() < Duration::from_secs(5));

    let report = validator.run();
    assert!(report.has_code("live.job.timeout"));
    assert!(report.succeeded(), "{report:?}");
    assert!(!backend.requests().iter().any(|request| request.ends_with("/results")));
}

#[test]
fn polling_survives_transient_errors() {
    let calls = Arc::new(Mutex::new(0_u32));
    let counter = Arc::clone(&calls);
    let backend = FakeBackend::start(move |_, _| {
        let mut count = counter.lock().expect("counter");
        *count += 1;
        if *count < 3 {
            (502, "bad gateway".to_string())
        } else {
            ok(r#"{"job_id":"job-1","type":"pipeline","status":"failed"}"#)
        }
    });
    let mut report = RunReport::new();
    assert_eq!(validator(&backend).wait_for_terminal(&mut report, "job-1"), JobPollOutcome::Failed);
    assert_eq!(report.failed(), 0);
}

#[test]
fn failed_job_still_checks_results() {
    let backend = FakeBackend::start(|method, path| match (method, path) {
        ("GET", "/jobs/job-1/results") => ok(r#"{"error":"R process exited"}"#),
        _ => job_api(method, path, "failed"),
    });
    let report = validator(&backend).run();
    assert!(report.has_code("live.job.failed"));
    assert!(report.has_code("live.results.error"));
    assert!(!report.succeeded());
}

#[test]
fn incomplete_results_warn() {
    let backend = FakeBackend::start(|_, _| ok(r#"{"error":"Job not completed"}"#));
    let mut report = RunReport::new();
    assert!(validator(&backend).check_job_results(&mut report, "job-1"));
    assert!(report.has_code("live.results.pending"));
    assert!(report.succeeded());
}

#[test]
fn unrecognized_results_shape_warns_and_passes() {
    let backend = FakeBackend::start(|_, _| ok(r#"{"summary":"done"}"#));
    let mut report = RunReport::new();
    assert!(validator(&backend).check_job_results(&mut report, "job-1"));
    assert!(report.has_code("live.results.shape"));
    assert!(report.has_code("live.results"));
    assert_eq!((report.passed(), report.warnings()), (1, 1));
}

#[test]
fn unknown_job_variants() {
    let backend = FakeBackend::start(|_, _| (404, r#"{"error":"Job not found"}"#.to_string()));
    let mut report = RunReport::new();
    assert!(validator(&backend).check_unknown_job(&mut report));
    assert!(report.has_code("live.unknown.status"));

    let backend = FakeBackend::start(|_, _| ok(r#"{"status":"pending"}"#));
    let mut report = RunReport::new();
    assert!(validator(&backend).check_unknown_job(&mut report));
    assert!(report.has_code("live.unknown.message"));
    assert_eq!(report.warnings(), 1);
}

#[test]
fn non_json_body_fails_the_check() {
    let backend = FakeBackend::start(|_, _| ok("<html>oops</html>"));
    let mut report = RunReport::new();
    assert!(!validator(&backend).check_list_jobs(&mut report));
    let finding = report.findings().iter().find(|f| f.code == "live.jobs").expect("finding");
    assert!(finding.message.contains("not valid JSON"), "{}", finding.message);
}
