//! Test selection inputs and test levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which tests a run should execute.
///
/// Empty lists mean "not supplied". At most one of the three is expected to
/// be populated; the argument parser enforces that and validation re-checks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSpecifier {
    /// Explicit test names, `Class` or `Class.method`
    pub tests: Vec<String>,
    /// Apex class names
    pub class_names: Vec<String>,
    /// Apex test suite names
    pub suite_names: Vec<String>,
}

impl TestSpecifier {
    /// Create an empty specifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Select explicit tests
    pub fn with_tests<I, S>(mut self, tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tests = tests.into_iter().map(Into::into).collect();
        self
    }

    /// Select classes
    pub fn with_class_names<I, S>(mut self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_names = class_names.into_iter().map(Into::into).collect();
        self
    }

    /// Select suites
    pub fn with_suite_names<I, S>(mut self, suite_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suite_names = suite_names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether any selector was supplied
    pub fn is_present(&self) -> bool {
        self.populated_count() > 0
    }

    /// Number of selectors that carry at least one entry
    pub fn populated_count(&self) -> usize {
        [&self.tests, &self.class_names, &self.suite_names]
            .iter()
            .filter(|list| !list.is_empty())
            .count()
    }

    /// Comma-joined tests, if any
    pub fn joined_tests(&self) -> Option<String> {
        join(&self.tests)
    }

    /// Comma-joined class names, if any
    pub fn joined_class_names(&self) -> Option<String> {
        join(&self.class_names)
    }

    /// Comma-joined suite names, if any
    pub fn joined_suite_names(&self) -> Option<String> {
        join(&self.suite_names)
    }
}

fn join(list: &[String]) -> Option<String> {
    if list.is_empty() {
        None
    } else {
        Some(list.join(","))
    }
}

/// Scope selector for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestLevel {
    RunLocalTests,
    RunAllTestsInOrg,
    RunSpecifiedTests,
}

impl TestLevel {
    /// All levels in the order they are presented to users
    pub const ALL: [TestLevel; 3] = [
        TestLevel::RunLocalTests,
        TestLevel::RunAllTestsInOrg,
        TestLevel::RunSpecifiedTests,
    ];

    /// Canonical name as accepted on the command line and by the service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RunLocalTests => "RunLocalTests",
            Self::RunAllTestsInOrg => "RunAllTestsInOrg",
            Self::RunSpecifiedTests => "RunSpecifiedTests",
        }
    }
}

impl fmt::Display for TestLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid test level '{}', expected one of: {}",
                    s,
                    Self::ALL.map(|l| l.as_str()).join(", ")
                )
            })
    }
}
