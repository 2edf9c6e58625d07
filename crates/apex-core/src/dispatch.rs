//! Choosing and invoking the execution path

use crate::error::{ApexError, ApexResult};
use crate::model::{TestLevel, TestRunOutcome, TestRunPayload, TestSpecifier};
use crate::remap::remap_run_error;
use crate::service::TestExecutionService;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Inputs of a single dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub spec: TestSpecifier,
    pub test_level: TestLevel,
    pub synchronous: bool,
    pub code_coverage: bool,
    /// How long the service may poll an asynchronous run
    pub wait: Option<Duration>,
    /// Whether the caller emits machine-readable output
    pub json_enabled: bool,
}

impl DispatchRequest {
    /// Whether the synchronous service call is used.
    ///
    /// NOTE: requesting `synchronous` with any level other than
    /// `RunSpecifiedTests` silently falls back to an asynchronous run. Callers
    /// rely on that fallback, so it is kept as is.
    pub fn uses_synchronous_path(&self) -> bool {
        self.synchronous && self.test_level == TestLevel::RunSpecifiedTests
    }

    /// `immediately_return` flag passed to the asynchronous call.
    ///
    /// A positive wait always lets the service poll up to that wait.
    /// Otherwise the run id is returned right away unless the caller asked for
    /// synchronous semantics with human output.
    pub fn immediately_return(&self) -> bool {
        match self.wait {
            Some(wait) if !wait.is_zero() => false,
            _ => !(self.synchronous && !self.json_enabled),
        }
    }
}

/// Invokes the execution service on behalf of one command invocation
pub struct ExecutionDispatcher<'a> {
    service: &'a dyn TestExecutionService,
    token: CancellationToken,
}

impl<'a> ExecutionDispatcher<'a> {
    pub fn new(service: &'a dyn TestExecutionService, token: CancellationToken) -> Self {
        Self { service, token }
    }

    /// Run the request through the appropriate service call.
    ///
    /// Service failures are passed through [`remap_run_error`]. Anything that
    /// comes back after cancellation was requested, success or failure, is
    /// discarded in favour of `Cancelled`.
    #[instrument(skip(self, request), fields(level = %request.test_level, sync = request.synchronous))]
    pub async fn dispatch(&self, request: DispatchRequest) -> ApexResult<TestRunOutcome> {
        if self.token.is_cancelled() {
            return Err(ApexError::Cancelled);
        }

        let outcome = if request.uses_synchronous_path() {
            let payload = TestRunPayload::synchronous_for(
                &request.spec,
                request.test_level,
                request.code_coverage,
            );
            debug!(?payload, "running tests synchronously");
            self.service
                .run_synchronous(payload, request.code_coverage, &self.token)
                .await
                .map(TestRunOutcome::Detailed)
        } else {
            let payload = TestRunPayload::asynchronous_for(
                &request.spec,
                request.test_level,
                request.code_coverage,
            );
            let immediately_return = request.immediately_return();
            debug!(?payload, immediately_return, wait = ?request.wait, "running tests asynchronously");
            self.service
                .run_asynchronous(
                    payload,
                    request.code_coverage,
                    immediately_return,
                    &self.token,
                    request.wait.filter(|wait| !wait.is_zero()),
                )
                .await
        };

        if self.token.is_cancelled() {
            match &outcome {
                Ok(outcome) => {
                    info!(run_id = outcome.test_run_id(), "discarding result of a cancelled run")
                }
                Err(e) => debug!("run failed after cancellation was requested: {}", e),
            }
            return Err(ApexError::Cancelled);
        }

        outcome.map_err(|e| remap_run_error(e, &request.spec, request.test_level))
    }
}
