//! Test Anything Protocol output

use apex_core::DetailedResult;
use apex_core::model::TestOutcome;
use std::fmt::Write;

pub fn render(result: &DetailedResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "1..{}", result.tests.len());

    for (index, test) in result.tests.iter().enumerate() {
        let number = index + 1;
        match test.outcome {
            TestOutcome::Pass => {
                let _ = writeln!(out, "ok {} {}", number, test.full_name);
            }
            TestOutcome::Skip => {
                let _ = writeln!(out, "ok {} {} # SKIP", number, test.full_name);
            }
            TestOutcome::Fail | TestOutcome::CompileFail => {
                let _ = writeln!(out, "not ok {} {}", number, test.full_name);
                let diagnostics = test.message.iter().chain(test.stack_trace.iter());
                for line in diagnostics.flat_map(|text| text.lines()) {
                    let _ = writeln!(out, "# {}", line);
                }
            }
        }
    }

    let _ = writeln!(out, "# Test run id: {}", result.summary.test_run_id);
    out
}
