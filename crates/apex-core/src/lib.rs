//! Apex Runner Core Library
//!
//! Orchestration of remote Apex test runs: flag validation, test level
//! resolution, execution dispatch, cancellation, error remapping and result
//! finalization. Network access and rendering are left to the
//! [`TestExecutionService`] and [`ResultReporter`] collaborators.

pub mod cancellation;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod persistence;
pub mod remap;
pub mod service;
pub mod sink;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use cancellation::CancellationController;
pub use dispatch::{DispatchRequest, ExecutionDispatcher};
pub use error::{ApexError, ApexResult};
pub use model::{
    DetailedResult, RunIdResult, TestLevel, TestRunOutcome, TestRunPayload, TestSpecifier,
};
pub use orchestrator::{GetTestRequest, RunTestRequest, TestRunner};
pub use service::{ReportOptions, ReportOutput, ResultFormat, ResultReporter, TestExecutionService};
pub use sink::{CommandResult, ResultSink};
pub use validation::{RunFlags, resolve_test_level, validate_flags};

/// Re-exported so collaborators share the exact token type
pub use tokio_util::sync::CancellationToken;
