//! Core error type for Apex Runner

use super::messages::{CLASS_SUITE_TEST_ERR, MISSING_REPORTER_ERR, SYNC_CLASS_ERR, TEST_LEVEL_ERR};
use super::CANCELLED_EXIT_CODE;
use thiserror::Error;

/// Result type alias for Apex Runner operations
pub type ApexResult<T> = Result<T, ApexError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Wrap any displayable error as a persistence failure at `path`
    fn persistence_context(self, path: impl Into<String>) -> ApexResult<T>;

    /// Wrap any displayable error as a configuration failure
    fn config_context<C: std::fmt::Display>(self, context: C) -> ApexResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn persistence_context(self, path: impl Into<String>) -> ApexResult<T> {
        self.map_err(|e| ApexError::persistence(e.to_string(), path))
    }

    fn config_context<C: std::fmt::Display>(self, context: C) -> ApexResult<T> {
        self.map_err(|e| ApexError::config(format!("{}: {}", context, e)))
    }
}

/// Main error type for Apex Runner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApexError {
    /// Synchronous run asked for suites or more than one class
    #[error("{}", SYNC_CLASS_ERR)]
    SyncClass,

    /// Tests, classes or suites were selected with a level other than RunSpecifiedTests
    #[error("{}", TEST_LEVEL_ERR)]
    TestLevel,

    /// Code coverage requested without a result format to render it
    #[error("{}", MISSING_REPORTER_ERR)]
    MissingReporter,

    /// More than one of tests, class names and suite names was populated
    #[error("{}", CLASS_SUITE_TEST_ERR)]
    ConflictingSelectors,

    /// Failure raised by the test execution service
    #[error("{message}")]
    Server {
        message: String,
        code: Option<String>,
        actions: Vec<String>,
        context: Option<String>,
    },

    /// The invocation was cancelled by a termination signal
    #[error("Cancelled")]
    Cancelled,

    /// Writing result files failed
    #[error("Failed to write {path}: {message}")]
    Persistence { message: String, path: String },

    /// Configuration or connection resolution failed
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        actions: Vec<String>,
    },

    /// Rendering a result failed
    #[error("Report error: {message}")]
    Report { message: String },
}

impl ApexError {
    /// Stable identifier used in JSON output
    pub fn error_code(&self) -> &str {
        match self {
            Self::SyncClass => "SyncClassError",
            Self::TestLevel => "TestLevelError",
            Self::MissingReporter => "MissingReporterError",
            Self::ConflictingSelectors => "ClassSuiteTestError",
            Self::Server { code, .. } => code.as_deref().unwrap_or("ServerError"),
            Self::Cancelled => "Cancelled",
            Self::Persistence { .. } => "PersistenceError",
            Self::Config { .. } => "ConfigError",
            Self::Report { .. } => "ReportError",
        }
    }

    /// Remediation steps to show alongside the message
    pub fn actions(&self) -> &[String] {
        match self {
            Self::Server { actions, .. } | Self::Config { actions, .. } => actions,
            _ => &[],
        }
    }

    /// Whether the failure was detected locally before any remote call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::SyncClass | Self::TestLevel | Self::MissingReporter | Self::ConflictingSelectors
        )
    }

    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => CANCELLED_EXIT_CODE,
            _ => 1,
        }
    }
}
