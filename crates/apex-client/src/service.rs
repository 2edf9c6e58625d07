//! HTTP implementation of `TestExecutionService`

use crate::error_utils::{handle_http_error, parse_error, transport_error};
use crate::status::{RunStatus, TestRunStatus};
use apex_core::config::{ApexConfig, OrgConnection};
use apex_core::error::{ApexError, ApexResult};
use apex_core::model::{DetailedResult, RunIdResult, TestRunOutcome, TestRunPayload};
use apex_core::{CancellationToken, TestExecutionService, persistence};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Test service reached over HTTP with a bearer token
pub struct HttpTestService {
    http_client: Client,
    connection: OrgConnection,
    poll_interval: Duration,
    /// Run id of the run started by this service, if any, for `cancel`
    active_run: Mutex<Option<String>>,
}

impl fmt::Debug for HttpTestService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTestService")
            .field("org", &self.connection.alias)
            .field("instance_url", &self.connection.instance_url)
            .field("api_version", &self.connection.api_version)
            .field("poll_interval", &self.poll_interval)
            .field("active_run", &self.active_run())
            .finish()
    }
}

impl HttpTestService {
    /// Create a service for `connection` using timeouts from `config`
    pub fn new(connection: OrgConnection, config: &ApexConfig) -> ApexResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApexError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            connection,
            poll_interval: config.poll_interval(),
            active_run: Mutex::new(None),
        })
    }

    /// Override the interval between status polls
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Username of the connected org, if known
    pub fn username(&self) -> Option<&str> {
        self.connection.username.as_deref()
    }

    pub(crate) fn tooling_url(&self, path: &str) -> String {
        format!(
            "{}/services/data/v{}/tooling/{}",
            self.connection.instance_url, self.connection.api_version, path
        )
    }

    pub(crate) fn active_run(&self) -> Option<String> {
        self.active_run.lock().clone()
    }

    /// Send a request and decode its JSON body, giving up as soon as the
    /// token is cancelled.
    ///
    /// A response dropped here is lost: if the service had already enqueued
    /// a run, its id is never recorded and `cancel` cannot abort it.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
        token: &CancellationToken,
    ) -> ApexResult<T> {
        let request = request.bearer_auth(&self.connection.access_token);

        let response = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ApexError::Cancelled),
            response = request.send() => response.map_err(|e| transport_error(e, operation))?,
        };

        if !response.status().is_success() {
            return Err(handle_http_error(response, operation).await);
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ApexError::Cancelled),
            body = response.json::<T>() => body.map_err(|e| parse_error(e, operation)),
        }
    }

    async fn fetch_status(
        &self,
        test_run_id: &str,
        code_coverage: bool,
        token: &CancellationToken,
    ) -> ApexResult<TestRunStatus> {
        let request = self
            .http_client
            .get(self.tooling_url(&format!("testRuns/{}", test_run_id)))
            .query(&[("codeCoverage", code_coverage)]);
        self.send(request, "testRuns", token).await
    }

    /// Poll until the run finishes, `wait` elapses, or the token is cancelled
    async fn poll_until_complete(
        &self,
        test_run_id: &str,
        code_coverage: bool,
        token: &CancellationToken,
        wait: Option<Duration>,
    ) -> ApexResult<TestRunOutcome> {
        // A wait too large for the clock means no deadline.
        let deadline = wait.and_then(|wait| Instant::now().checked_add(wait));
        let mut last_progress = String::new();

        loop {
            let status = self.fetch_status(test_run_id, code_coverage, token).await?;

            let progress = status.progress();
            if progress != last_progress {
                info!(run_id = test_run_id, "{}", progress);
                last_progress = progress;
            }

            if status.status.is_terminal() {
                return finished_result(test_run_id, status).map(TestRunOutcome::Detailed);
            }

            let mut pause = self.poll_interval;
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    info!(run_id = test_run_id, "wait elapsed before the run completed");
                    return Ok(TestRunOutcome::RunId(RunIdResult::new(test_run_id)));
                }
                pause = pause.min(deadline - now);
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ApexError::Cancelled),
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }
}

/// Extract the result of a run in a terminal state
pub(crate) fn finished_result(test_run_id: &str, status: TestRunStatus) -> ApexResult<DetailedResult> {
    match status.status {
        RunStatus::Completed => status.result.ok_or_else(|| {
            ApexError::server(format!("Test run {} completed without a result", test_run_id))
        }),
        RunStatus::Aborted => Err(ApexError::server(format!(
            "Test run {} was aborted",
            test_run_id
        ))),
        RunStatus::Failed => Err(ApexError::server(format!(
            "Test run {} failed: {}",
            test_run_id,
            status.extended_status.as_deref().unwrap_or("no details")
        ))),
        RunStatus::Queued | RunStatus::Processing => Err(ApexError::server(format!(
            "Test run {} has not completed yet ({:?})",
            test_run_id, status.status
        ))),
    }
}

#[async_trait]
impl TestExecutionService for HttpTestService {
    #[instrument(skip_all, fields(org = %self.connection.alias))]
    async fn run_synchronous(
        &self,
        payload: TestRunPayload,
        code_coverage: bool,
        token: &CancellationToken,
    ) -> ApexResult<DetailedResult> {
        debug!(code_coverage, "POST runTestsSynchronous");
        let request = self
            .http_client
            .post(self.tooling_url("runTestsSynchronous"))
            .json(&payload);
        self.send(request, "runTestsSynchronous", token).await
    }

    #[instrument(skip_all, fields(org = %self.connection.alias))]
    async fn run_asynchronous(
        &self,
        payload: TestRunPayload,
        code_coverage: bool,
        immediately_return: bool,
        token: &CancellationToken,
        wait: Option<Duration>,
    ) -> ApexResult<TestRunOutcome> {
        let request = self
            .http_client
            .post(self.tooling_url("runTestsAsynchronous"))
            .json(&payload);
        let test_run_id: String = self.send(request, "runTestsAsynchronous", token).await?;
        info!(run_id = %test_run_id, "test run enqueued");
        *self.active_run.lock() = Some(test_run_id.clone());

        if immediately_return {
            return Ok(TestRunOutcome::RunId(RunIdResult::new(test_run_id)));
        }

        let outcome = self
            .poll_until_complete(&test_run_id, code_coverage, token, wait)
            .await;
        if matches!(outcome, Ok(TestRunOutcome::Detailed(_))) {
            self.active_run.lock().take();
        }
        outcome
    }

    async fn report_async_results(
        &self,
        test_run_id: &str,
        code_coverage: bool,
        token: &CancellationToken,
    ) -> ApexResult<DetailedResult> {
        let status = self.fetch_status(test_run_id, code_coverage, token).await?;
        finished_result(test_run_id, status)
    }

    async fn cancel(&self) -> ApexResult<()> {
        let Some(test_run_id) = self.active_run() else {
            debug!("no active test run to abort");
            return Ok(());
        };

        info!(run_id = %test_run_id, "aborting test run");
        let response = self
            .http_client
            .post(self.tooling_url(&format!("testRuns/{}/abort", test_run_id)))
            .bearer_auth(&self.connection.access_token)
            .send()
            .await
            .map_err(|e| transport_error(e, "abort"))?;

        if !response.status().is_success() {
            let err = handle_http_error(response, "abort").await;
            warn!(run_id = %test_run_id, "abort rejected: {}", err);
            return Err(err);
        }

        self.active_run.lock().take();
        Ok(())
    }

    async fn write_result_files(
        &self,
        outcome: &TestRunOutcome,
        output_dir: &Path,
        code_coverage: bool,
    ) -> ApexResult<Vec<PathBuf>> {
        persistence::write_result_files(outcome, output_dir, code_coverage).await
    }
}
