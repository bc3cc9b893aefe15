// crates/contract-parity-live/src/validator.rs
// ============================================================================
// Module: Live Backend Validator
// Description: Sequential checks against the job API of a running backend.
// Purpose: Assert status codes and required JSON fields per endpoint.
// Dependencies: contract-parity-config, contract-parity-core, serde_json
// ============================================================================

//! ## Overview
//! Each check records its own findings and returns whether it succeeded.
//! Request failures are local to the check that issued them. The only
//! cross-check dependency is that job-scoped checks need the identifier
//! returned by the demo submission.
//!
//! Status polling is bounded: it sleeps a fixed interval between attempts
//! and gives up at the configured ceiling with [`JobPollOutcome::Timeout`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;
use std::time::Instant;

use contract_parity_config::LiveSettings;
use contract_parity_core::RunReport;
use serde_json::Map;
use serde_json::Value;

use crate::client::JsonClient;
use crate::client::LiveError;
use crate::client::RawResponse;
use crate::client::RequestError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Job status values the backend may report.
const VALID_STATUSES: &[&str] = &["pending", "running", "completed", "failed"];
/// Fields a pipeline results payload may carry.
const RESULT_FIELDS: &[&str] = &["algorithm", "age_group", "country", "calibrated_csmf", "files"];
/// Results error meaning the job has not finished yet.
const NOT_COMPLETED_ERROR: &str = "Job not completed";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Terminal state observed while polling a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPollOutcome {
    /// The job reported `completed`.
    Completed,
    /// The job reported `failed`.
    Failed,
    /// The ceiling elapsed without a terminal status.
    Timeout,
}

impl JobPollOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Timeout => "timeout",
        }
    }
}

/// Validator for a running backend.
#[derive(Debug, Clone)]
pub struct LiveValidator {
    /// JSON client rooted at the backend base URL.
    client: JsonClient,
    /// Validated settings.
    settings: LiveSettings,
}

// ============================================================================
// SECTION: Validator
// ============================================================================

impl LiveValidator {
    /// Builds a validator from settings.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError`] when the settings are invalid or the HTTP client
    /// cannot be built.
    pub fn new(settings: &LiveSettings) -> Result<Self, LiveError> {
        settings.validate().map_err(|err| LiveError::Settings(err.to_string()))?;
        let client = JsonClient::new(
            &settings.base_url,
            Duration::from_millis(settings.request_timeout_ms),
        )?;
        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    /// Returns the settings in use.
    #[must_use]
    pub const fn settings(&self) -> &LiveSettings {
        &self.settings
    }

    /// Runs every check in order and returns the merged report.
    #[must_use]
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::new();
        report.info("live.target", format!("Validating backend at {}", self.client.base()));
        if !self.check_health(&mut report) {
            report.fail("live.backend_down", "Backend appears to be down. Is the server running?");
            return report;
        }

        self.check_list_jobs(&mut report);

        if let Some(job_id) = self.submit_demo_job(&mut report) {
            self.check_job_status(&mut report, &job_id);
            self.check_job_log(&mut report, &job_id);
            let outcome = self.wait_for_terminal(&mut report, &job_id);
            match outcome {
                JobPollOutcome::Completed => {
                    report.pass("live.job.completed", "Job completed successfully");
                    self.check_job_results(&mut report, &job_id);
                }
                JobPollOutcome::Failed => {
                    report.warn("live.job.failed", "Job failed during execution");
                    self.check_job_results(&mut report, &job_id);
                }
                JobPollOutcome::Timeout => {
                    report.warn(
                        "live.job.timeout",
                        format!("Job did not complete within timeout (status: {})", outcome.as_str()),
                    );
                }
            }
        }

        self.check_unknown_job(&mut report);
        report
    }

    /// Checks `GET /health`.
    pub fn check_health(&self, report: &mut RunReport) -> bool {
        report.info("live.health.start", "Testing GET /health");
        let Some(data) = self.fetch_object(report, "live.health", "Health check", &["health"])
        else {
            return false;
        };
        let status = data.get("status").map(scalar_text);
        if status.as_deref() != Some("ok") {
            report.fail(
                "live.health.status",
                format!("Health status not 'ok': {}", status.as_deref().unwrap_or("null")),
            );
            return false;
        }
        if !data.contains_key("timestamp") {
            report.warn("live.health.timestamp", "Health response missing 'timestamp' field");
        }
        report.pass("live.health", "Health check endpoint working correctly");
        true
    }

    /// Checks `GET /jobs`.
    pub fn check_list_jobs(&self, report: &mut RunReport) -> bool {
        report.info("live.jobs.start", "Testing GET /jobs");
        let Some(data) = self.fetch_object(report, "live.jobs", "List jobs", &["jobs"]) else {
            return false;
        };
        match data.get("jobs") {
            None => {
                report.fail("live.jobs.fields", "List jobs response missing 'jobs' field");
                false
            }
            Some(Value::Array(jobs)) => {
                report.pass(
                    "live.jobs",
                    format!("List jobs endpoint working correctly ({} jobs)", jobs.len()),
                );
                true
            }
            Some(other) => {
                report.fail(
                    "live.jobs.fields",
                    format!("Jobs field is not a list: {}", json_type(other)),
                );
                false
            }
        }
    }

    /// Submits `POST /jobs/demo` and returns the new job identifier.
    pub fn submit_demo_job(&self, report: &mut RunReport) -> Option<String> {
        report.info("live.demo.start", "Testing POST /jobs/demo");
        let query = self.settings.demo_job.iter().flat_map(|(name, value)| {
            value.values().iter().map(move |item| (name.as_str(), item.as_str()))
        });
        let result = self.client.post_query(&["jobs", "demo"], query);
        let data = expect_object(report, "live.demo", "Demo job submission", result)?;
        let missing = missing_fields(&data, &["job_id", "status", "message"]);
        if !missing.is_empty() {
            report
                .fail(
                    "live.demo.fields",
                    format!("Demo job response missing fields: {}", missing.join(", ")),
                )
                .with_details(missing);
            return None;
        }
        let status = data.get("status").map(scalar_text).unwrap_or_default();
        if status != "pending" {
            report.warn(
                "live.demo.status",
                format!("Demo job status is '{status}', expected 'pending'"),
            );
        }
        let job_id = data.get("job_id").map(scalar_text).unwrap_or_default();
        if job_id.is_empty() {
            report.fail("live.demo.fields", "Demo job response has an empty job_id");
            return None;
        }
        report.pass("live.demo", format!("Demo job submitted successfully (job_id: {job_id})"));
        Some(job_id)
    }

    /// Checks `GET /jobs/{id}/status`.
    pub fn check_job_status(&self, report: &mut RunReport, job_id: &str) -> bool {
        report.info("live.status.start", format!("Testing GET /jobs/{job_id}/status"));
        let Some(data) =
            self.fetch_object(report, "live.status", "Job status", &["jobs", job_id, "status"])
        else {
            return false;
        };
        let missing = missing_fields(&data, &["job_id", "type", "status"]);
        if !missing.is_empty() {
            report
                .fail(
                    "live.status.fields",
                    format!("Job status response missing fields: {}", missing.join(", ")),
                )
                .with_details(missing);
            return false;
        }
        let status = data.get("status").map(scalar_text).unwrap_or_default();
        if !VALID_STATUSES.contains(&status.as_str()) {
            report.warn("live.status.value", format!("Unexpected job status: {status}"));
        }
        report.pass("live.status", format!("Job status endpoint working (status: {status})"));
        true
    }

    /// Checks `GET /jobs/{id}/log`.
    pub fn check_job_log(&self, report: &mut RunReport, job_id: &str) -> bool {
        report.info("live.log.start", format!("Testing GET /jobs/{job_id}/log"));
        let Some(data) = self.fetch_object(report, "live.log", "Job log", &["jobs", job_id, "log"])
        else {
            return false;
        };
        if !missing_fields(&data, &["job_id", "log"]).is_empty() {
            report.fail("live.log.fields", "Job log response missing required fields");
            return false;
        }
        match data.get("log") {
            Some(Value::Array(entries)) => {
                report.pass(
                    "live.log",
                    format!("Job log endpoint working ({} log entries)", entries.len()),
                );
                true
            }
            other => {
                report.fail(
                    "live.log.fields",
                    format!("Log field is not a list: {}", other.map_or("null", json_type)),
                );
                false
            }
        }
    }

    /// Polls `GET /jobs/{id}/status` until a terminal status or the ceiling.
    ///
    /// Request failures and non-200 responses during polling are retried.
    pub fn wait_for_terminal(&self, report: &mut RunReport, job_id: &str) -> JobPollOutcome {
        let ceiling = Duration::from_millis(self.settings.poll_timeout_ms);
        let interval = Duration::from_millis(self.settings.poll_interval_ms);
        report.info(
            "live.poll.start",
            format!("Waiting for job {job_id} to complete (max {}s)...", ceiling.as_secs()),
        );
        let started = Instant::now();
        while started.elapsed() < ceiling {
            if let Ok(response) = self.client.get(&["jobs", job_id, "status"])
                && response.status == 200
                && let Ok(Value::Object(data)) = response.json()
            {
                match data.get("status").map(scalar_text).as_deref() {
                    Some("completed") => return JobPollOutcome::Completed,
                    Some("failed") => return JobPollOutcome::Failed,
                    _ => {}
                }
            }
            thread::sleep(interval);
        }
        JobPollOutcome::Timeout
    }

    /// Checks `GET /jobs/{id}/results`.
    pub fn check_job_results(&self, report: &mut RunReport, job_id: &str) -> bool {
        report.info("live.results.start", format!("Testing GET /jobs/{job_id}/results"));
        let Some(data) =
            self.fetch_object(report, "live.results", "Job results", &["jobs", job_id, "results"])
        else {
            return false;
        };
        if let Some(error) = data.get("error") {
            let error = scalar_text(error);
            if error == NOT_COMPLETED_ERROR {
                report.warn("live.results.pending", "Job not yet completed");
                return true;
            }
            report.fail("live.results.error", format!("Job results error: {error}"));
            return false;
        }
        let present = RESULT_FIELDS.iter().filter(|field| data.contains_key(**field)).count();
        if present > 0 {
            report.pass(
                "live.results",
                format!("Job results endpoint working (found {present} expected fields)"),
            );
        } else {
            report.warn(
                "live.results.shape",
                "Job results structure doesn't match expected pipeline format",
            );
            report.pass("live.results", "Job results endpoint accessible");
        }
        true
    }

    /// Checks that an unknown job identifier yields a not-found error object.
    pub fn check_unknown_job(&self, report: &mut RunReport) -> bool {
        report.info("live.unknown.start", "Testing error handling for nonexistent job");
        let job_id = self.settings.unknown_job_id.as_str();
        let response = match self.client.get(&["jobs", job_id, "status"]) {
            Ok(response) => response,
            Err(err) => {
                report.fail("live.unknown", format!("Nonexistent job test failed: {err}"));
                return false;
            }
        };
        if response.status != 200 {
            report.warn(
                "live.unknown.status",
                format!("Expected 200 with error object, got {}", response.status),
            );
            return true;
        }
        let not_found = match response.json() {
            Ok(Value::Object(data)) => data
                .get("error")
                .map(scalar_text)
                .is_some_and(|error| error.to_lowercase().contains("not found")),
            Ok(_) => false,
            Err(err) => {
                report.fail("live.unknown", format!("Nonexistent job test failed: {err}"));
                return false;
            }
        };
        if not_found {
            report.pass("live.unknown", "Nonexistent job handled correctly");
        } else {
            report.warn("live.unknown.message", "Nonexistent job didn't return expected error message");
        }
        true
    }

    /// Issues `GET` and requires a 200 JSON object, recording failures.
    fn fetch_object(
        &self,
        report: &mut RunReport,
        code: &str,
        label: &str,
        segments: &[&str],
    ) -> Option<Map<String, Value>> {
        expect_object(report, code, label, self.client.get(segments))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Requires a 200 response carrying a JSON object, recording failures.
fn expect_object(
    report: &mut RunReport,
    code: &str,
    label: &str,
    result: Result<RawResponse, RequestError>,
) -> Option<Map<String, Value>> {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            report.fail(code, format!("{label} failed: {err}"));
            return None;
        }
    };
    if response.status != 200 {
        report.fail(code, format!("{label} returned status {}", response.status));
        return None;
    }
    match response.json() {
        Ok(Value::Object(data)) => Some(data),
        Ok(other) => {
            report.fail(code, format!("{label} returned {} instead of an object", json_type(&other)));
            None
        }
        Err(err) => {
            report.fail(code, format!("{label} failed: {err}"));
            None
        }
    }
}

/// Returns the required fields absent from `data`.
fn missing_fields(data: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| !data.contains_key(**field))
        .map(ToString::to_string)
        .collect()
}

/// Renders a JSON scalar as text; single-element arrays are unboxed.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) if items.len() == 1 => items.first().map(scalar_text).unwrap_or_default(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Returns the JSON type name of `value`.
const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
