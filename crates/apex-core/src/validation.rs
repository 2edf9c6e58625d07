//! Flag validation and test level resolution
//!
//! Everything here is a pure decision over explicit inputs and runs before
//! any request reaches the execution service.

use crate::error::{ApexError, ApexResult};
use crate::model::{TestLevel, TestSpecifier};
use crate::service::ResultFormat;

/// Run flags that take part in validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub synchronous: bool,
    pub test_level: Option<TestLevel>,
    pub code_coverage: bool,
    pub result_format: Option<ResultFormat>,
}

/// Validate selection inputs against the run flags and return the effective level.
///
/// Rules are checked in order and the first violation wins:
/// 1. at most one of tests, class names and suite names
/// 2. code coverage needs a result format
/// 3. synchronous runs take at most one class and no suites
/// 4. any selector requires `RunSpecifiedTests` when a level is given
pub fn validate_flags(spec: &TestSpecifier, flags: &RunFlags) -> ApexResult<TestLevel> {
    if spec.populated_count() > 1 {
        return Err(ApexError::ConflictingSelectors);
    }

    if flags.code_coverage && flags.result_format.is_none() {
        return Err(ApexError::MissingReporter);
    }

    if flags.synchronous && (!spec.suite_names.is_empty() || spec.class_names.len() > 1) {
        return Err(ApexError::SyncClass);
    }

    if spec.is_present() {
        if let Some(level) = flags.test_level {
            if level != TestLevel::RunSpecifiedTests {
                return Err(ApexError::TestLevel);
            }
        }
    }

    Ok(resolve_test_level(spec, flags.test_level))
}

/// Effective level: the explicit one, else `RunSpecifiedTests` when anything
/// is selected, else `RunLocalTests`.
pub fn resolve_test_level(spec: &TestSpecifier, explicit: Option<TestLevel>) -> TestLevel {
    match explicit {
        Some(level) => level,
        None if spec.is_present() => TestLevel::RunSpecifiedTests,
        None => TestLevel::RunLocalTests,
    }
}
