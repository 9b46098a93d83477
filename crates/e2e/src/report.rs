//! Result reporters

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::E2eResult;
use crate::runner::{RunReport, TestResult, TestStatus};

/// Receives results as the run progresses
pub trait Reporter: Send + Sync {
    fn on_begin(&self, _total: usize) {}

    /// Called from worker tasks as soon as a test has its final status
    fn on_test_end(&self, result: &TestResult);

    fn on_end(&self, _report: &RunReport) -> E2eResult<()> {
        Ok(())
    }
}

/// One log line per finished test
#[derive(Debug, Default)]
pub struct ListReporter;

impl ListReporter {
    fn line(result: &TestResult) -> String {
        let mark = match result.status {
            TestStatus::Passed => "✓",
            TestStatus::Failed => "✘",
            TestStatus::Flaky => "~",
            TestStatus::Skipped => "-",
        };
        let mut line = format!(
            "{} [{}] › {} ({} ms)",
            mark,
            result.project,
            result.full_title(),
            result.duration_ms
        );
        if result.retries > 0 {
            line.push_str(&format!(" (retries: {})", result.retries));
        }
        if result.expected_failure && result.status == TestStatus::Passed {
            line.push_str(" (expected failure)");
        }
        line
    }
}

impl Reporter for ListReporter {
    fn on_test_end(&self, result: &TestResult) {
        let line = Self::line(result);
        match result.status {
            TestStatus::Failed => error!(
                "{} - {}",
                line,
                result.error.as_deref().unwrap_or("unknown error")
            ),
            TestStatus::Flaky => warn!("{}", line),
            _ => info!("{}", line),
        }
    }

    fn on_end(&self, report: &RunReport) -> E2eResult<()> {
        for result in report.results.iter().filter(|r| r.status == TestStatus::Failed) {
            for attachment in &result.attachments {
                info!(
                    "  {} {}: {}",
                    result.title,
                    attachment.name,
                    attachment.path.display()
                );
            }
        }
        Ok(())
    }
}

/// Writes the run summary to `test-results.json`
#[derive(Debug)]
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn write_results(&self, report: &RunReport) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Reporter for JsonReporter {
    fn on_test_end(&self, _result: &TestResult) {}

    fn on_end(&self, report: &RunReport) -> E2eResult<()> {
        self.write_results(report).map(|_| ())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllureResult {
    uuid: String,
    history_id: String,
    name: String,
    full_name: String,
    status: &'static str,
    status_details: AllureStatusDetails,
    stage: &'static str,
    start: i64,
    stop: i64,
    labels: Vec<AllureLabel>,
    attachments: Vec<AllureAttachment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllureStatusDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    known: bool,
    flaky: bool,
}

#[derive(Debug, Serialize)]
struct AllureLabel {
    name: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct AllureAttachment {
    name: String,
    source: String,
    #[serde(rename = "type")]
    content_type: String,
}

/// Writes one Allure result file per test
#[derive(Debug)]
pub struct AllureReporter {
    results_dir: PathBuf,
}

impl AllureReporter {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    fn status(result: &TestResult) -> &'static str {
        match result.status {
            TestStatus::Passed | TestStatus::Flaky => "passed",
            TestStatus::Skipped => "skipped",
            TestStatus::Failed => {
                let assertion = result
                    .error
                    .as_deref()
                    .map(|e| e.starts_with("Assertion failed") || e.starts_with("Expected to fail"))
                    .unwrap_or(false);
                if assertion {
                    "failed"
                } else {
                    "broken"
                }
            }
        }
    }

    fn to_allure(&self, result: &TestResult) -> (AllureResult, Vec<(PathBuf, PathBuf)>) {
        let uuid = Uuid::new_v4().to_string();
        let full_name = format!("{}:{}", result.project, result.full_title());

        let mut labels = vec![
            AllureLabel {
                name: "parentSuite",
                value: result.project.clone(),
            },
            AllureLabel {
                name: "framework",
                value: "saucedemo-e2e".to_string(),
            },
        ];
        if !result.suite.is_empty() {
            labels.push(AllureLabel {
                name: "suite",
                value: result.suite.clone(),
            });
        }
        for tag in &result.tags {
            labels.push(AllureLabel {
                name: "tag",
                value: tag.trim_start_matches('@').to_string(),
            });
        }

        let mut attachments = Vec::new();
        let mut copies = Vec::new();
        for attachment in &result.attachments {
            let extension = attachment
                .path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            let source = format!("{}-attachment{}", Uuid::new_v4(), extension);
            copies.push((attachment.path.clone(), self.results_dir.join(&source)));
            attachments.push(AllureAttachment {
                name: attachment.name.clone(),
                source,
                content_type: attachment.content_type.clone(),
            });
        }

        let allure = AllureResult {
            uuid,
            history_id: history_id(&full_name),
            name: result.title.clone(),
            full_name,
            status: Self::status(result),
            status_details: AllureStatusDetails {
                message: result.error.clone(),
                known: result.expected_failure,
                flaky: result.status == TestStatus::Flaky,
            },
            stage: "finished",
            start: result.started_at.timestamp_millis(),
            stop: result.finished_at.timestamp_millis(),
            labels,
            attachments,
        };
        (allure, copies)
    }

    pub fn write_result(&self, result: &TestResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.results_dir)?;
        let (allure, copies) = self.to_allure(result);

        for (from, to) in copies {
            if let Err(e) = copy_if_present(&from, &to) {
                warn!("Cannot copy attachment {}: {}", from.display(), e);
            }
        }

        let path = self.results_dir.join(format!("{}-result.json", allure.uuid));
        std::fs::write(&path, serde_json::to_string_pretty(&allure)?)?;
        Ok(path)
    }
}

fn copy_if_present(from: &Path, to: &Path) -> std::io::Result<()> {
    if from.exists() {
        std::fs::copy(from, to)?;
    }
    Ok(())
}

/// Stable id so Allure can track a test across runs
fn history_id(full_name: &str) -> String {
    let digest = Sha256::digest(full_name.as_bytes());
    hex::encode(&digest[..16])
}

impl Reporter for AllureReporter {
    fn on_test_end(&self, result: &TestResult) {
        if let Err(e) = self.write_result(result) {
            error!("Allure result for '{}' not written: {}", result.title, e);
        }
    }
}
