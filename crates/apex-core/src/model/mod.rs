//! Data model shared by the orchestration core and its collaborators

mod payload;
pub(crate) mod result;
mod specifier;

pub use payload::{TestItem, TestRunPayload};
pub use result::{
    ApexClassRef, CoverageRecord, DetailedResult, PerClassCoverage, RunIdResult, RunOutcome,
    TestCaseResult, TestOutcome, TestRunOutcome, TestSummary,
};
pub use specifier::{TestLevel, TestSpecifier};
