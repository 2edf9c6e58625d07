//! User-facing message catalog

pub const SYNC_CLASS_ERR: &str = "Synchronous test runs can include test methods from only one Apex class. Omit the --synchronous flag or include tests from only one class.";

pub const TEST_LEVEL_ERR: &str =
    "When specifying class names, suite names, or tests, indicate RunSpecifiedTests as the test level.";

pub const MISSING_REPORTER_ERR: &str = "Select a result format when specifying code coverage.";

pub const CLASS_SUITE_TEST_ERR: &str = "Specify either class names, suite names, or tests.";

/// Substring of the server message returned when a run request selects nothing.
pub const NO_TEST_CRITERIA_SERVER_MSG: &str =
    "Always provide a classes, suites, tests, or testLevel property";

pub const NO_TESTS_TO_RUN: &str = "There are no Apex tests to run in this org.";

pub const NO_TESTS_ACTION: &str = "Ensure Apex Tests exist in the org, and try again.";
