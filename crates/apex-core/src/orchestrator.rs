//! End-to-end flow of the `run test` and `get test` commands

use crate::cancellation::CancellationController;
use crate::dispatch::{DispatchRequest, ExecutionDispatcher};
use crate::error::{ApexError, ApexResult};
use crate::model::{TestRunOutcome, TestSpecifier};
use crate::service::{ReportOptions, ResultReporter, TestExecutionService};
use crate::sink::{CommandResult, ResultSink};
use crate::validation::{RunFlags, validate_flags};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};

/// Everything the `run test` command collected from its flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTestRequest {
    pub spec: TestSpecifier,
    pub flags: RunFlags,
    pub wait: Option<Duration>,
    pub output_dir: Option<PathBuf>,
    pub report: ReportOptions,
}

/// Everything the `get test` command collected from its flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTestRequest {
    pub test_run_id: String,
    pub output_dir: Option<PathBuf>,
    pub report: ReportOptions,
}

/// Drives one command invocation against its collaborators
pub struct TestRunner<'a> {
    service: &'a dyn TestExecutionService,
    reporter: &'a dyn ResultReporter,
    controller: &'a CancellationController,
    bin: String,
    target_org: Option<String>,
}

impl<'a> TestRunner<'a> {
    pub fn new(
        service: &'a dyn TestExecutionService,
        reporter: &'a dyn ResultReporter,
        controller: &'a CancellationController,
    ) -> Self {
        Self {
            service,
            reporter,
            controller,
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

    /// Validate, dispatch and finalize a test run.
    ///
    /// Validation failures return before the service is contacted. On
    /// cancellation this waits for the service notification to settle.
    #[instrument(skip_all)]
    pub async fn run(&self, request: RunTestRequest) -> ApexResult<CommandResult> {
        let test_level = validate_flags(&request.spec, &request.flags)?;
        info!(%test_level, "starting test run");

        let dispatcher = ExecutionDispatcher::new(self.service, self.controller.token());
        let dispatched = dispatcher
            .dispatch(DispatchRequest {
                spec: request.spec,
                test_level,
                synchronous: request.flags.synchronous,
                code_coverage: request.flags.code_coverage,
                wait: request.wait,
                json_enabled: request.report.json_enabled,
            })
            .await;

        let code_coverage = request.flags.code_coverage;
        let result = match dispatched {
            Ok(outcome) => {
                self.sink(request.report)
                    .finalize(outcome, request.output_dir.as_deref(), code_coverage)
                    .await
            }
            Err(e) => Err(e),
        };

        self.settle(result).await
    }

    /// Fetch and report the result of an earlier asynchronous run
    #[instrument(skip_all, fields(run_id = %request.test_run_id))]
    pub async fn fetch(&self, request: GetTestRequest) -> ApexResult<CommandResult> {
        self.controller.checkpoint()?;

        let code_coverage = request.report.code_coverage;
        let fetched = self
            .service
            .report_async_results(&request.test_run_id, code_coverage, &self.controller.token())
            .await;

        let result = match fetched {
            Ok(detailed) => {
                self.sink(request.report)
                    .finalize(
                        TestRunOutcome::Detailed(detailed),
                        request.output_dir.as_deref(),
                        code_coverage,
                    )
                    .await
            }
            Err(_) if self.controller.is_requested() => Err(ApexError::Cancelled),
            Err(e) => Err(e),
        };

        self.settle(result).await
    }

    fn sink(&self, report: ReportOptions) -> ResultSink<'a> {
        ResultSink::new(self.service, self.reporter, self.controller.token(), report)
            .with_follow_up(self.bin.clone(), self.target_org.clone())
    }

    async fn settle(&self, result: ApexResult<CommandResult>) -> ApexResult<CommandResult> {
        if matches!(result, Err(ApexError::Cancelled)) {
            self.controller.settled().await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result::fixtures::failed_result;
    use crate::model::{RunIdResult, TestLevel};
    use crate::service::ResultFormat;
    use crate::test_support::{Call, EchoReporter, FakeExecutionService};

    #[tokio::test]
    async fn test_validation_failure_never_reaches_service() {
        let service = FakeExecutionService::new();
        let controller = CancellationController::new();
        let runner = TestRunner::new(&service, &EchoReporter, &controller);

        let err = runner
            .run(RunTestRequest {
                spec: TestSpecifier::new().with_tests(["T.m1"]),
                flags: RunFlags {
                    code_coverage: true,
                    ..RunFlags::default()
                },
                ..RunTestRequest::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err, ApexError::MissingReporter);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sync_run_reports_result() {
        let service = FakeExecutionService::new().with_sync_response(Ok(failed_result("7078")));
        let controller = CancellationController::new();
        let runner = TestRunner::new(&service, &EchoReporter, &controller);

        let result = runner
            .run(RunTestRequest {
                spec: TestSpecifier::new().with_tests(["T.m1", "T2.m2"]),
                flags: RunFlags {
                    synchronous: true,
                    code_coverage: true,
                    result_format: Some(ResultFormat::Human),
                    ..RunFlags::default()
                },
                ..RunTestRequest::default()
            })
            .await
            .unwrap();

        assert_eq!(result.exit_code(), 100);
        assert!(matches!(service.calls()[0], Call::Sync { .. }));
    }

    #[tokio::test]
    async fn test_async_run_returns_run_id_guidance() {
        let service = FakeExecutionService::new()
            .with_async_response(Ok(TestRunOutcome::RunId(RunIdResult::new("707ABC"))));
        let controller = CancellationController::new();
        let runner = TestRunner::new(&service, &EchoReporter, &controller)
            .with_follow_up("apex", Some("ci".to_string()));

        let result = runner
            .run(RunTestRequest {
                flags: RunFlags {
                    test_level: Some(TestLevel::RunAllTestsInOrg),
                    ..RunFlags::default()
                },
                ..RunTestRequest::default()
            })
            .await
            .unwrap();

        let CommandResult::RunId { result, guidance } = result else {
            panic!("expected a run id");
        };
        assert_eq!(result.test_run_id, "707ABC");
        assert!(guidance[0].contains("--test-run-id 707ABC --target-org ci"));
    }

    #[tokio::test]
    async fn test_cancelled_run_waits_for_settle() {
        let service = FakeExecutionService::new()
            .with_sync_response(Ok(failed_result("7079")))
            .cancelling_during_run();
        let controller = CancellationController::new();
        let runner = TestRunner::new(&service, &EchoReporter, &controller);

        let err = runner
            .run(RunTestRequest {
                spec: TestSpecifier::new().with_class_names(["A"]),
                flags: RunFlags {
                    synchronous: true,
                    ..RunFlags::default()
                },
                ..RunTestRequest::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err, ApexError::Cancelled);
    }

    #[tokio::test]
    async fn test_fetch_reports_previous_run() {
        let service = FakeExecutionService::new().with_sync_response(Ok(failed_result("707OLD")));
        let controller = CancellationController::new();
        let runner = TestRunner::new(&service, &EchoReporter, &controller);

        let result = runner
            .fetch(GetTestRequest {
                test_run_id: "707OLD".to_string(),
                ..GetTestRequest::default()
            })
            .await
            .unwrap();

        assert!(matches!(result, CommandResult::Report(_)));
        assert_eq!(service.calls(), vec![Call::Report("707OLD".to_string())]);
    }
}
