//! Run status as reported by the service

use apex_core::DetailedResult;
use serde::Deserialize;

/// Lifecycle of an asynchronous run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RunStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Aborted,
}

impl RunStatus {
    /// Whether the run will not change state any more
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }
}

/// Body of `GET testRuns/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunStatus {
    pub status: RunStatus,
    #[serde(default)]
    pub tests_completed: u32,
    #[serde(default)]
    pub tests_total: u32,
    #[serde(default)]
    pub extended_status: Option<String>,
    #[serde(default)]
    pub result: Option<DetailedResult>,
}

impl TestRunStatus {
    /// One-line progress description
    pub fn progress(&self) -> String {
        match &self.extended_status {
            Some(extended) => format!("{:?} {}", self.status, extended),
            None => format!(
                "{:?} ({}/{} tests)",
                self.status, self.tests_completed, self.tests_total
            ),
        }
    }
}
