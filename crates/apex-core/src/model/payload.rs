//! Request payloads sent to the execution service

use super::specifier::{TestLevel, TestSpecifier};
use serde::{Deserialize, Serialize};

/// One class and, optionally, the methods to run in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestItem {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_methods: Vec<String>,
}

/// Body of a run request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunPayload {
    pub test_level: TestLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<TestItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite_names: Option<String>,
    pub skip_code_coverage: bool,
}

impl TestRunPayload {
    /// Payload for a synchronous run.
    ///
    /// Synchronous runs address tests as class items; class names become
    /// items without methods.
    pub fn synchronous(
        level: TestLevel,
        tests: Option<&str>,
        class_names: Option<&str>,
        code_coverage: bool,
    ) -> Self {
        let items = match (tests, class_names) {
            (Some(tests), _) => Some(parse_test_items(tests)),
            (None, Some(classes)) => Some(
                split_list(classes)
                    .map(|name| TestItem {
                        class_name: name.to_string(),
                        namespace: None,
                        test_methods: Vec::new(),
                    })
                    .collect(),
            ),
            (None, None) => None,
        };

        Self {
            test_level: level,
            tests: items,
            class_names: None,
            suite_names: None,
            skip_code_coverage: !code_coverage,
        }
    }

    /// Payload for an asynchronous run
    pub fn asynchronous(
        level: TestLevel,
        tests: Option<&str>,
        class_names: Option<&str>,
        suite_names: Option<&str>,
        code_coverage: bool,
    ) -> Self {
        Self {
            test_level: level,
            tests: tests.map(parse_test_items),
            class_names: if tests.is_none() { class_names.map(str::to_string) } else { None },
            suite_names: if tests.is_none() && class_names.is_none() {
                suite_names.map(str::to_string)
            } else {
                None
            },
            skip_code_coverage: !code_coverage,
        }
    }

    /// Convenience wrapper over [`Self::synchronous`] for a specifier
    pub fn synchronous_for(spec: &TestSpecifier, level: TestLevel, code_coverage: bool) -> Self {
        Self::synchronous(
            level,
            spec.joined_tests().as_deref(),
            spec.joined_class_names().as_deref(),
            code_coverage,
        )
    }

    /// Convenience wrapper over [`Self::asynchronous`] for a specifier
    pub fn asynchronous_for(spec: &TestSpecifier, level: TestLevel, code_coverage: bool) -> Self {
        Self::asynchronous(
            level,
            spec.joined_tests().as_deref(),
            spec.joined_class_names().as_deref(),
            spec.joined_suite_names().as_deref(),
            code_coverage,
        )
    }
}

fn split_list(joined: &str) -> impl Iterator<Item = &str> {
    joined.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Group `Class`, `Class.method` and `ns.Class.method` entries by class,
/// preserving first-seen order.
fn parse_test_items(joined: &str) -> Vec<TestItem> {
    let mut items: Vec<TestItem> = Vec::new();

    for entry in split_list(joined) {
        let parts: Vec<&str> = entry.split('.').collect();
        let (namespace, class_name, method) = match parts.as_slice() {
            [class] => (None, *class, None),
            [class, method] => (None, *class, Some(*method)),
            [ns, class, method, ..] => (Some(*ns), *class, Some(*method)),
            [] => continue,
        };

        let position = items
            .iter()
            .position(|item| item.class_name == class_name && item.namespace.as_deref() == namespace);

        let index = match position {
            Some(index) => index,
            None => {
                items.push(TestItem {
                    class_name: class_name.to_string(),
                    namespace: namespace.map(str::to_string),
                    test_methods: Vec::new(),
                });
                items.len() - 1
            }
        };
        let item = &mut items[index];

        if let Some(method) = method {
            if !item.test_methods.iter().any(|m| m == method) {
                item.test_methods.push(method.to_string());
            }
        }
    }

    items
}
