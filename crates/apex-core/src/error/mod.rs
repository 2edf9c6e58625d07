//! Error types for Apex Runner
//!
//! All failures in the workspace surface as [`ApexError`]. Every variant carries
//! a human-readable message and, where the user can do something about it,
//! remediation actions:
//! - error_code: stable identifier for programmatic handling and JSON output
//! - actions: suggested next steps shown under the message
//! - exit_code: process status the CLI terminates with

mod constructors;
mod messages;
mod types;

pub use messages::{
    CLASS_SUITE_TEST_ERR, MISSING_REPORTER_ERR, NO_TESTS_ACTION, NO_TESTS_TO_RUN,
    NO_TEST_CRITERIA_SERVER_MSG, SYNC_CLASS_ERR, TEST_LEVEL_ERR,
};
pub use types::{ApexError, ApexResult, ResultExt};

/// Exit status for a test run that finished with failing tests.
pub const FAILURE_EXIT_CODE: i32 = 100;

/// Exit status used when the invocation was cancelled by a signal.
pub const CANCELLED_EXIT_CODE: i32 = 130;
