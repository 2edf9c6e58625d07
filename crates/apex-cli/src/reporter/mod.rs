//! Rendering of finished test runs
//!
//! [`ConsoleReporter`] implements the core `ResultReporter` for every
//! `--result-format`. Human output is the default when no format is given.

mod human;
mod junit;
mod tap;


use apex_core::error::FAILURE_EXIT_CODE;
use apex_core::model::RunOutcome;
use apex_core::{
    ApexError, ApexResult, DetailedResult, ReportOptions, ReportOutput, ResultFormat,
    ResultReporter,
};
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ResultReporter for ConsoleReporter {
    fn report(&self, result: &DetailedResult, options: &ReportOptions) -> ApexResult<ReportOutput> {
        let json = json_result(result, options)?;

        let rendered = match options.result_format.unwrap_or(ResultFormat::Human) {
            ResultFormat::Human => human::render(result, options),
            ResultFormat::Json => {
                let mut text = serde_json::to_string_pretty(&json)
                    .map_err(|e| ApexError::report(format!("Failed to render JSON: {}", e)))?;
                text.push('\n');
                text
            }
            ResultFormat::Tap => tap::render(result),
            ResultFormat::Junit => junit::render(result),
        };

        Ok(ReportOutput {
            rendered,
            json,
            exit_code: exit_code(result),
        })
    }
}

/// Exit status for a reported run
pub fn exit_code(result: &DetailedResult) -> i32 {
    if result.summary.outcome == RunOutcome::Failed {
        FAILURE_EXIT_CODE
    } else {
        0
    }
}

/// JSON form of a result, limited to the coverage the caller asked for
fn json_result(result: &DetailedResult, options: &ReportOptions) -> ApexResult<Value> {
    let mut value = serde_json::to_value(result)
        .map_err(|e| ApexError::report(format!("Failed to serialize result: {}", e)))?;

    if !options.code_coverage {
        if let Some(map) = value.as_object_mut() {
            map.remove("codeCoverage");
        }
    }
    if !options.detailed_coverage {
        if let Some(tests) = value.get_mut("tests").and_then(Value::as_array_mut) {
            for test in tests.iter_mut().filter_map(Value::as_object_mut) {
                test.remove("perClassCoverage");
            }
        }
    }

    Ok(value)
}

/// `part` of `whole` as a rounded percentage string
pub(crate) fn percent(part: u32, whole: u32) -> String {
    if whole == 0 {
        return "0%".to_string();
    }
    let rounded = (f64::from(part) * 100.0 / f64::from(whole)).round();
    format!("{}%", rounded)
}
