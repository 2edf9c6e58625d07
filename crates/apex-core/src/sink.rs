//! Final step of a run: report a finished result or hand back a run id

use crate::error::{ApexError, ApexResult};
use crate::model::{RunIdResult, TestRunOutcome};
use crate::service::{ReportOptions, ReportOutput, ResultReporter, TestExecutionService};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What the command hands back to its caller
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// A finished run, formatted by the reporter
    Report(ReportOutput),
    /// A run that is still going, plus instructions to fetch it later
    RunId {
        result: RunIdResult,
        guidance: Vec<String>,
    },
}

impl CommandResult {
    /// Exit status for this result
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Report(output) => output.exit_code,
            Self::RunId { .. } => 0,
        }
    }
}

/// Follow-up command shown for unfinished runs
pub fn follow_up_command(bin: &str, test_run_id: &str, target_org: Option<&str>) -> String {
    match target_org {
        Some(org) => format!(
            "Run \"{} get test --test-run-id {} --target-org {}\" to retrieve test results.",
            bin, test_run_id, org
        ),
        None => format!(
            "Run \"{} get test --test-run-id {}\" to retrieve test results.",
            bin, test_run_id
        ),
    }
}

/// Collaborators and settings for finalizing a run
pub struct ResultSink<'a> {
    service: &'a dyn TestExecutionService,
    reporter: &'a dyn ResultReporter,
    token: CancellationToken,
    report_options: ReportOptions,
    bin: String,
    target_org: Option<String>,
}

impl<'a> ResultSink<'a> {
    pub fn new(
        service: &'a dyn TestExecutionService,
        reporter: &'a dyn ResultReporter,
        token: CancellationToken,
        report_options: ReportOptions,
    ) -> Self {
        Self {
            service,
            reporter,
            token,
            report_options,
            bin: "apex".to_string(),
            target_org: None,
        }
    }

    /// Name the binary and org used in follow-up guidance
    pub fn with_follow_up(mut self, bin: impl Into<String>, target_org: Option<String>) -> Self {
        self.bin = bin.into();
        self.target_org = target_org;
        self
    }

    /// Turn a run outcome into the command result.
    ///
    /// Fails with `Cancelled` whenever cancellation was requested, even for a
    /// result that had already arrived.
    pub async fn finalize(
        &self,
        outcome: TestRunOutcome,
        output_dir: Option<&Path>,
        code_coverage: bool,
    ) -> ApexResult<CommandResult> {
        if self.token.is_cancelled() {
            debug!(run_id = outcome.test_run_id(), "skipping finalize for cancelled run");
            return Err(ApexError::Cancelled);
        }

        if let Some(dir) = output_dir {
            let written = self
                .service
                .write_result_files(&outcome, dir, code_coverage)
                .await?;
            info!("Wrote {} result file(s) to {}", written.len(), dir.display());
        }

        match outcome {
            TestRunOutcome::Detailed(result) => {
                let output = self.reporter.report(&result, &self.report_options)?;
                Ok(CommandResult::Report(output))
            }
            TestRunOutcome::RunId(result) => {
                let guidance = vec![follow_up_command(
                    &self.bin,
                    &result.test_run_id,
                    self.target_org.as_deref(),
                )];
                Ok(CommandResult::RunId { result, guidance })
            }
        }
    }
}
