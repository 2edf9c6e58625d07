//! Rewriting of ambiguous service errors
//!
//! The service answers "Always provide a classes, suites, tests, or testLevel
//! property" both when a request truly selected nothing and when the org has
//! no tests at all. Only the caller knows which one happened.

use crate::error::{ApexError, NO_TESTS_ACTION, NO_TESTS_TO_RUN, NO_TEST_CRITERIA_SERVER_MSG};
use crate::model::{TestLevel, TestSpecifier};
use tracing::debug;

/// Substitute a clearer message for the "no criteria" server error when the
/// caller did supply criteria: a selector, or a level other than the default.
/// Every other error is returned unchanged.
pub fn remap_run_error(error: ApexError, spec: &TestSpecifier, level: TestLevel) -> ApexError {
    let is_no_criteria = matches!(
        &error,
        ApexError::Server { message, .. } if message.contains(NO_TEST_CRITERIA_SERVER_MSG)
    );
    if !is_no_criteria {
        return error;
    }

    // Nothing selected and no level beyond the default: the server is right.
    let supplied_criteria = spec.is_present() || level == TestLevel::RunAllTestsInOrg;
    if !supplied_criteria {
        return error;
    }

    debug!(test_level = %level, "remapping no-criteria error to no-tests-in-org");
    error.with_message_and_actions(NO_TESTS_TO_RUN, vec![NO_TESTS_ACTION.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_criteria() -> ApexError {
        ApexError::Server {
            message: format!("INVALID_INPUT: {}", NO_TEST_CRITERIA_SERVER_MSG),
            code: Some("INVALID_INPUT".to_string()),
            actions: Vec::new(),
            context: Some("runTestsAsynchronous".to_string()),
        }
    }

    #[test]
    fn test_class_names_rewrite_to_no_tests() {
        let spec = TestSpecifier::new().with_class_names(["A"]);
        let err = remap_run_error(no_criteria(), &spec, TestLevel::RunSpecifiedTests);

        assert_eq!(
            err,
            ApexError::Server {
                message: NO_TESTS_TO_RUN.to_string(),
                code: Some("INVALID_INPUT".to_string()),
                actions: vec![NO_TESTS_ACTION.to_string()],
                context: Some("runTestsAsynchronous".to_string()),
            }
        );
    }

    #[test]
    fn test_all_tests_level_rewrites() {
        let err =
            remap_run_error(no_criteria(), &TestSpecifier::new(), TestLevel::RunAllTestsInOrg);
        assert_eq!(err.to_string(), NO_TESTS_TO_RUN);
        assert_eq!(err.actions(), [NO_TESTS_ACTION.to_string()]);
    }

    #[test]
    fn test_default_level_without_selectors_passes_through() {
        let err = remap_run_error(no_criteria(), &TestSpecifier::new(), TestLevel::RunLocalTests);
        assert_eq!(err, no_criteria());
    }

    #[test]
    fn test_specified_level_without_selectors_passes_through() {
        let err = remap_run_error(
            no_criteria(),
            &TestSpecifier::new(),
            TestLevel::RunSpecifiedTests,
        );
        assert_eq!(err, no_criteria());
    }

    #[test]
    fn test_unrelated_errors_pass_through() {
        let spec = TestSpecifier::new().with_class_names(["A"]);
        let err = ApexError::server("INVALID_SESSION_ID");
        assert_eq!(
            remap_run_error(err.clone(), &spec, TestLevel::RunSpecifiedTests),
            err
        );
        assert_eq!(
            remap_run_error(ApexError::Cancelled, &spec, TestLevel::RunSpecifiedTests),
            ApexError::Cancelled
        );
    }
}
