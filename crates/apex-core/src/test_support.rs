//! In-memory execution service for unit tests

use crate::error::{ApexError, ApexResult};
use crate::model::{DetailedResult, RunIdResult, TestRunOutcome, TestRunPayload};
use crate::persistence;
use crate::service::{ReportOptions, ReportOutput, ResultReporter, TestExecutionService};
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use parking_lot::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Sync {
        payload: TestRunPayload,
        code_coverage: bool,
    },
    Async {
        payload: TestRunPayload,
        code_coverage: bool,
        immediately_return: bool,
        wait: Option<Duration>,
    },
    Report(String),
    Cancel,
    Write {
        run_id: String,
        code_coverage: bool,
    },
}

pub(crate) struct FakeExecutionService {
    calls: Mutex<Vec<Call>>,
    sync_response: Mutex<Option<ApexResult<DetailedResult>>>,
    async_response: Mutex<Option<ApexResult<TestRunOutcome>>>,
    cancel_error: Option<ApexError>,
    cancel_delay: Option<Duration>,
    cancel_during_run: bool,
}

impl FakeExecutionService {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sync_response: Mutex::new(None),
            async_response: Mutex::new(None),
            cancel_error: None,
            cancel_delay: None,
            cancel_during_run: false,
        }
    }

    pub(crate) fn with_sync_response(self, response: ApexResult<DetailedResult>) -> Self {
        *self.sync_response.lock() = Some(response);
        self
    }

    pub(crate) fn with_async_response(self, response: ApexResult<TestRunOutcome>) -> Self {
        *self.async_response.lock() = Some(response);
        self
    }

    pub(crate) fn with_cancel_error(mut self, error: ApexError) -> Self {
        self.cancel_error = Some(error);
        self
    }

    pub(crate) fn with_cancel_delay(mut self, delay: Duration) -> Self {
        self.cancel_delay = Some(delay);
        self
    }

    /// Cancel the caller's token while the run call is in flight, then succeed anyway
    pub(crate) fn cancelling_during_run(mut self) -> Self {
        self.cancel_during_run = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn race(&self, token: &CancellationToken) {
        if self.cancel_during_run {
            token.cancel();
        }
    }
}

#[async_trait]
impl TestExecutionService for FakeExecutionService {
    async fn run_synchronous(
        &self,
        payload: TestRunPayload,
        code_coverage: bool,
        token: &CancellationToken,
    ) -> ApexResult<DetailedResult> {
        self.record(Call::Sync {
            payload,
            code_coverage,
        });
        self.race(token);
        self.sync_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(ApexError::server("no sync response configured")))
    }

    async fn run_asynchronous(
        &self,
        payload: TestRunPayload,
        code_coverage: bool,
        immediately_return: bool,
        token: &CancellationToken,
        wait: Option<Duration>,
    ) -> ApexResult<TestRunOutcome> {
        self.record(Call::Async {
            payload,
            code_coverage,
            immediately_return,
            wait,
        });
        self.race(token);
        self.async_response
            .lock()
            .take()
            .unwrap_or_else(|| Ok(TestRunOutcome::RunId(RunIdResult::new("707FAKE"))))
    }

    async fn report_async_results(
        &self,
        test_run_id: &str,
        _code_coverage: bool,
        token: &CancellationToken,
    ) -> ApexResult<DetailedResult> {
        self.record(Call::Report(test_run_id.to_string()));
        self.race(token);
        self.sync_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(ApexError::server("no report response configured")))
    }

    async fn cancel(&self) -> ApexResult<()> {
        self.record(Call::Cancel);
        if let Some(delay) = self.cancel_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.cancel_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn write_result_files(
        &self,
        outcome: &TestRunOutcome,
        output_dir: &Path,
        code_coverage: bool,
    ) -> ApexResult<Vec<PathBuf>> {
        self.record(Call::Write {
            run_id: outcome.test_run_id().to_string(),
            code_coverage,
        });
        persistence::write_result_files(outcome, output_dir, code_coverage).await
    }
}

/// Reporter that echoes the run id and fails the exit status on failures
pub(crate) struct EchoReporter;

impl ResultReporter for EchoReporter {
    fn report(&self, result: &DetailedResult, options: &ReportOptions) -> ApexResult<ReportOutput> {
        Ok(ReportOutput {
            rendered: format!("run {}", result.summary.test_run_id),
            json: json!({ "testRunId": result.summary.test_run_id, "concise": options.concise }),
            exit_code: if result.summary.failing > 0 { 100 } else { 0 },
        })
    }
}
