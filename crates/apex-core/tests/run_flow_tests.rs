//! End-to-end run flows against an in-memory service

use apex_core::error::{NO_TESTS_TO_RUN, NO_TEST_CRITERIA_SERVER_MSG};
use apex_core::model::{RunIdResult, TestRunOutcome, TestRunPayload};
use apex_core::persistence::TEST_RUN_ID_FILE;
use apex_core::{
    ApexError, ApexResult, CancellationController, CancellationToken, CommandResult,
    DetailedResult, ReportOptions, ReportOutput, ResultReporter, RunFlags, RunTestRequest,
    TestExecutionService, TestLevel, TestRunner, TestSpecifier,
};
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Service whose asynchronous run either answers with a fixed outcome or
/// blocks until the caller's token is cancelled.
struct ScriptedService {
    outcome: Mutex<Option<ApexResult<TestRunOutcome>>>,
    block_until_cancelled: bool,
    run_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    payloads: Mutex<Vec<TestRunPayload>>,
}

impl ScriptedService {
    fn answering(outcome: ApexResult<TestRunOutcome>) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
            block_until_cancelled: false,
            run_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    fn blocking() -> Self {
        Self {
            block_until_cancelled: true,
            ..Self::answering(Ok(TestRunOutcome::RunId(RunIdResult::new("707BLOCK"))))
        }
    }

    fn run_calls(&self) -> usize {
        self.run_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TestExecutionService for ScriptedService {
    async fn run_synchronous(
        &self,
        _payload: TestRunPayload,
        _code_coverage: bool,
        _token: &CancellationToken,
    ) -> ApexResult<DetailedResult> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        Err(ApexError::server("synchronous runs are not scripted"))
    }

    async fn run_asynchronous(
        &self,
        payload: TestRunPayload,
        _code_coverage: bool,
        _immediately_return: bool,
        token: &CancellationToken,
        _wait: Option<Duration>,
    ) -> ApexResult<TestRunOutcome> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload);
        if self.block_until_cancelled {
            token.cancelled().await;
            return Err(ApexError::Cancelled);
        }
        self.outcome.lock().unwrap().take().unwrap()
    }

    async fn report_async_results(
        &self,
        _test_run_id: &str,
        _code_coverage: bool,
        _token: &CancellationToken,
    ) -> ApexResult<DetailedResult> {
        Err(ApexError::server("not scripted"))
    }

    async fn cancel(&self) -> ApexResult<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn write_result_files(
        &self,
        outcome: &TestRunOutcome,
        output_dir: &Path,
        code_coverage: bool,
    ) -> ApexResult<Vec<PathBuf>> {
        apex_core::persistence::write_result_files(outcome, output_dir, code_coverage).await
    }
}

struct NullReporter;

impl ResultReporter for NullReporter {
    fn report(&self, _result: &DetailedResult, _options: &ReportOptions) -> ApexResult<ReportOutput> {
        Ok(ReportOutput {
            rendered: String::new(),
            json: json!({}),
            exit_code: 0,
        })
    }
}

#[tokio::test]
async fn test_sync_suite_request_rejected_before_network() {
    let service = ScriptedService::answering(Ok(TestRunOutcome::RunId(RunIdResult::new("x"))));
    let controller = CancellationController::new();
    let runner = TestRunner::new(&service, &NullReporter, &controller);

    let err = runner
        .run(RunTestRequest {
            spec: TestSpecifier::new().with_suite_names(["S"]),
            flags: RunFlags {
                synchronous: true,
                test_level: Some(TestLevel::RunSpecifiedTests),
                ..RunFlags::default()
            },
            ..RunTestRequest::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err, ApexError::SyncClass);
    assert_eq!(service.run_calls(), 0);
}

#[tokio::test]
async fn test_no_criteria_error_rewritten_for_class_names() {
    let service = ScriptedService::answering(Err(ApexError::server_with_code(
        NO_TEST_CRITERIA_SERVER_MSG,
        "INVALID_INPUT",
    )));
    let controller = CancellationController::new();
    let runner = TestRunner::new(&service, &NullReporter, &controller);

    let err = runner
        .run(RunTestRequest {
            spec: TestSpecifier::new().with_class_names(["A"]),
            ..RunTestRequest::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), NO_TESTS_TO_RUN);
    assert_eq!(err.error_code(), "INVALID_INPUT");
    assert_eq!(service.payloads.lock().unwrap()[0].class_names.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_no_criteria_error_passes_through_without_criteria() {
    let service = ScriptedService::answering(Err(ApexError::server(NO_TEST_CRITERIA_SERVER_MSG)));
    let controller = CancellationController::new();
    let runner = TestRunner::new(&service, &NullReporter, &controller);

    let err = runner.run(RunTestRequest::default()).await.unwrap_err();

    assert_eq!(err.to_string(), NO_TEST_CRITERIA_SERVER_MSG);
}

#[tokio::test]
async fn test_run_id_written_to_output_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let service =
        ScriptedService::answering(Ok(TestRunOutcome::RunId(RunIdResult::new("707DIR"))));
    let controller = CancellationController::new();
    let runner = TestRunner::new(&service, &NullReporter, &controller);

    let result = runner
        .run(RunTestRequest {
            output_dir: Some(dir.path().to_path_buf()),
            ..RunTestRequest::default()
        })
        .await
        .unwrap();

    assert!(matches!(result, CommandResult::RunId { .. }));
    assert_eq!(
        std::fs::read_to_string(dir.path().join(TEST_RUN_ID_FILE)).unwrap(),
        "707DIR"
    );
}

#[tokio::test]
async fn test_signal_during_run_cancels_and_notifies_once() {
    let service = Arc::new(ScriptedService::blocking());
    let controller = CancellationController::new();

    let run = {
        let service = Arc::clone(&service);
        let controller = controller.clone();
        tokio::spawn(async move {
            let runner = TestRunner::new(service.as_ref(), &NullReporter, &controller);
            runner.run(RunTestRequest::default()).await
        })
    };

    // Let the run reach the service before the "signal" arrives.
    while service.run_calls() == 0 {
        tokio::task::yield_now().await;
    }
    controller.trigger(service.as_ref()).await.unwrap();

    let result = run.await.unwrap();
    assert_eq!(result.unwrap_err(), ApexError::Cancelled);
    assert_eq!(service.cancel_calls.load(Ordering::SeqCst), 1);
}
