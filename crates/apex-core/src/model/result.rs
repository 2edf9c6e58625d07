//! Test run results returned by the execution service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Passed,
    Failed,
    Completed,
    Skipped,
}

/// Outcome of a single test method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    Pass,
    Fail,
    CompileFail,
    Skip,
}

impl TestOutcome {
    /// Whether this outcome counts as a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail | Self::CompileFail)
    }
}

/// Aggregate counts for a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub outcome: RunOutcome,
    pub tests_ran: u32,
    pub passing: u32,
    pub failing: u32,
    pub skipped: u32,
    pub pass_rate: String,
    pub fail_rate: String,
    pub test_start_time: DateTime<Utc>,
    pub test_execution_time_in_ms: u64,
    pub test_total_time_in_ms: u64,
    pub command_time_in_ms: u64,
    pub test_run_id: String,
    pub username: String,
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_wide_coverage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_run_coverage: Option<String>,
}

/// Class that declares a test method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApexClassRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_prefix: Option<String>,
}

/// Coverage a single test contributed to one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerClassCoverage {
    pub apex_class_or_trigger_name: String,
    pub apex_class_or_trigger_id: String,
    pub apex_test_class_id: String,
    pub apex_test_method_name: String,
    pub num_lines_covered: u32,
    pub num_lines_uncovered: u32,
    pub percentage: String,
}

/// Result of a single test method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub id: String,
    pub queue_item_id: String,
    pub method_name: String,
    pub full_name: String,
    pub outcome: TestOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(default)]
    pub run_time: u64,
    pub apex_class: ApexClassRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_class_coverage: Option<Vec<PerClassCoverage>>,
}

/// Aggregate coverage for one class or trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRecord {
    pub apex_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub percentage: String,
    pub num_lines_covered: u32,
    pub num_lines_uncovered: u32,
    #[serde(default)]
    pub uncovered_lines: Vec<u32>,
}

/// Full outcome of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedResult {
    pub summary: TestSummary,
    #[serde(default)]
    pub tests: Vec<TestCaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_coverage: Option<Vec<CoverageRecord>>,
}

impl DetailedResult {
    /// Tests that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &TestCaseResult> {
        self.tests.iter().filter(|t| t.outcome.is_failure())
    }
}

/// Handle to a run that has not finished yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunIdResult {
    pub test_run_id: String,
}

impl RunIdResult {
    pub fn new(test_run_id: impl Into<String>) -> Self {
        Self {
            test_run_id: test_run_id.into(),
        }
    }
}

/// What a run call produced.
///
/// Deserialization picks `Detailed` exactly when a `summary` field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestRunOutcome {
    Detailed(DetailedResult),
    RunId(RunIdResult),
}

impl TestRunOutcome {
    /// Run id of either variant
    pub fn test_run_id(&self) -> &str {
        match self {
            Self::Detailed(result) => &result.summary.test_run_id,
            Self::RunId(result) => &result.test_run_id,
        }
    }
}

impl From<DetailedResult> for TestRunOutcome {
    fn from(result: DetailedResult) -> Self {
        Self::Detailed(result)
    }
}

impl From<RunIdResult> for TestRunOutcome {
    fn from(result: RunIdResult) -> Self {
        Self::RunId(result)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::failed_result;
    use super::*;

    #[test]
    fn test_outcome_without_summary_is_run_id() {
        let outcome: TestRunOutcome =
            serde_json::from_str(r#"{"testRunId": "707000000000001"}"#).unwrap();
        assert_eq!(outcome, TestRunOutcome::RunId(RunIdResult::new("707000000000001")));
    }

    #[test]
    fn test_outcome_with_summary_is_detailed() {
        let json = serde_json::to_value(failed_result("7071")).unwrap();
        let outcome: TestRunOutcome = serde_json::from_value(json).unwrap();
        assert!(matches!(outcome, TestRunOutcome::Detailed(_)));
        assert_eq!(outcome.test_run_id(), "7071");
    }

    #[test]
    fn test_failures_filter() {
        let result = failed_result("7071");
        let names: Vec<_> = result.failures().map(|t| t.full_name.as_str()).collect();
        assert_eq!(names, vec!["AccountTest.testUpdate"]);
    }
}
