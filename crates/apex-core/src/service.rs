//! Collaborator abstractions
//!
//! The orchestration core never talks to the network or the terminal itself.
//! It drives two collaborators:
//!
//! - [`TestExecutionService`] - starts runs, polls them, cancels them, persists result files
//! - [`ResultReporter`] - turns a finished run into printable output

use crate::error::ApexResult;
use crate::model::{DetailedResult, TestRunOutcome, TestRunPayload};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Remote test execution.
///
/// Implementations must make [`cancel`](Self::cancel) safe to call at any
/// time: before a run started, while one is in flight, or after it finished.
#[async_trait]
pub trait TestExecutionService: Send + Sync {
    /// Run tests and wait for the full result
    async fn run_synchronous(
        &self,
        payload: TestRunPayload,
        code_coverage: bool,
        token: &CancellationToken,
    ) -> ApexResult<DetailedResult>;

    /// Enqueue a run.
    ///
    /// With `immediately_return` the run id comes back as soon as the run is
    /// enqueued. Otherwise the service polls until the run completes, or
    /// until `wait` elapses, in which case the bare run id is returned.
    async fn run_asynchronous(
        &self,
        payload: TestRunPayload,
        code_coverage: bool,
        immediately_return: bool,
        token: &CancellationToken,
        wait: Option<Duration>,
    ) -> ApexResult<TestRunOutcome>;

    /// Fetch the result of a previously started run
    async fn report_async_results(
        &self,
        test_run_id: &str,
        code_coverage: bool,
        token: &CancellationToken,
    ) -> ApexResult<DetailedResult>;

    /// Best-effort request to stop the active run
    async fn cancel(&self) -> ApexResult<()>;

    /// Persist result files for `outcome` into `output_dir`
    async fn write_result_files(
        &self,
        outcome: &TestRunOutcome,
        output_dir: &Path,
        code_coverage: bool,
    ) -> ApexResult<Vec<PathBuf>>;
}

/// Output formats understood by reporters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultFormat {
    Human,
    Json,
    Tap,
    Junit,
}

impl ResultFormat {
    pub const ALL: [ResultFormat; 4] = [Self::Human, Self::Json, Self::Tap, Self::Junit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Tap => "tap",
            Self::Junit => "junit",
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown result format '{}'", s))
    }
}

/// How a finished run should be rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub result_format: Option<ResultFormat>,
    pub code_coverage: bool,
    pub detailed_coverage: bool,
    pub concise: bool,
    pub json_enabled: bool,
}

/// Rendered run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    /// Text for the terminal; empty in JSON mode
    pub rendered: String,
    /// Machine-readable value returned to JSON callers
    pub json: Value,
    /// Status the process should exit with
    pub exit_code: i32,
}

/// Result formatting
pub trait ResultReporter: Send + Sync {
    fn report(&self, result: &DetailedResult, options: &ReportOptions) -> ApexResult<ReportOutput>;
}
