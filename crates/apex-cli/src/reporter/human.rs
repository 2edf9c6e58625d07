//! Human-readable tables

use super::percent;
use apex_core::model::{RunOutcome, TestCaseResult, TestOutcome};
use apex_core::{DetailedResult, ReportOptions};
use colored::*;
use std::fmt::Write;

pub fn render(result: &DetailedResult, options: &ReportOptions) -> String {
    let mut out = String::new();

    let failures: Vec<&TestCaseResult> = result.failures().collect();
    if !failures.is_empty() {
        section(&mut out, &format!("Test Failures [{}]", failures.len()));
        for test in &failures {
            let _ = writeln!(out, "{}", format!("• {}", test.full_name).red().bold());
            if let Some(message) = &test.message {
                let _ = writeln!(out, "  message: {}", message);
            }
            if let Some(stack_trace) = &test.stack_trace {
                let _ = writeln!(out, "  stacktrace:");
                for line in stack_trace.lines() {
                    let _ = writeln!(out, "    {}", line);
                }
            }
            out.push('\n');
        }
    }

    if !options.concise {
        section(&mut out, "Test Results");
        let rows: Vec<Vec<String>> = result
            .tests
            .iter()
            .map(|test| {
                vec![
                    test.full_name.clone(),
                    outcome_label(test.outcome),
                    test.message.clone().unwrap_or_default(),
                    test.run_time.to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["TEST NAME", "OUTCOME", "MESSAGE", "RUNTIME (MS)"], &rows));
        out.push('\n');
    }

    if options.code_coverage {
        if let Some(coverage) = &result.code_coverage {
            section(&mut out, "Apex Code Coverage by Class");
            let rows: Vec<Vec<String>> = coverage
                .iter()
                .map(|record| {
                    vec![
                        record.name.clone(),
                        record.percentage.clone(),
                        record
                            .uncovered_lines
                            .iter()
                            .map(u32::to_string)
                            .collect::<Vec<_>>()
                            .join(","),
                    ]
                })
                .collect();
            out.push_str(&table(&["CLASSES", "PERCENT", "UNCOVERED LINES"], &rows));
            out.push('\n');
        }
    }

    if options.detailed_coverage {
        section(
            &mut out,
            &format!(
                "Apex Code Coverage for Test Run {}",
                result.summary.test_run_id
            ),
        );
        let mut rows = Vec::new();
        for test in &result.tests {
            for coverage in test.per_class_coverage.iter().flatten() {
                rows.push(vec![
                    test.full_name.clone(),
                    coverage.apex_class_or_trigger_name.clone(),
                    outcome_label(test.outcome),
                    coverage.percentage.clone(),
                    test.message.clone().unwrap_or_default(),
                    test.run_time.to_string(),
                ]);
            }
        }
        out.push_str(&table(
            &[
                "TEST NAME",
                "CLASS BEING TESTED",
                "OUTCOME",
                "PERCENT",
                "MESSAGE",
                "RUNTIME (MS)",
            ],
            &rows,
        ));
        out.push('\n');
    }

    section(&mut out, "Test Summary");
    out.push_str(&table(&["NAME", "VALUE"], &summary_rows(result, options)));
    out
}

fn summary_rows(result: &DetailedResult, options: &ReportOptions) -> Vec<Vec<String>> {
    let summary = &result.summary;
    let outcome = match summary.outcome {
        RunOutcome::Passed => "Passed".green().bold().to_string(),
        RunOutcome::Failed => "Failed".red().bold().to_string(),
        RunOutcome::Completed => "Completed".to_string(),
        RunOutcome::Skipped => "Skipped".yellow().to_string(),
    };

    let mut rows = vec![
        row("Outcome", outcome),
        row("Tests Ran", summary.tests_ran.to_string()),
        row("Pass Rate", summary.pass_rate.clone()),
        row("Fail Rate", summary.fail_rate.clone()),
        row("Skip Rate", percent(summary.skipped, summary.tests_ran)),
        row("Test Run Id", summary.test_run_id.clone()),
        row(
            "Test Start Time",
            summary.test_start_time.format("%b %-d, %Y %-I:%M %p").to_string(),
        ),
        row(
            "Test Execution Time",
            format!("{} ms", summary.test_execution_time_in_ms),
        ),
        row("Test Total Time", format!("{} ms", summary.test_total_time_in_ms)),
        row("Command Time", format!("{} ms", summary.command_time_in_ms)),
        row("Org Id", summary.org_id.clone()),
        row("Username", summary.username.clone()),
    ];

    if options.code_coverage {
        if let Some(coverage) = &summary.org_wide_coverage {
            rows.push(row("Org Wide Coverage", coverage.clone()));
        }
        if let Some(coverage) = &summary.test_run_coverage {
            rows.push(row("Test Run Coverage", coverage.clone()));
        }
    }

    rows
}

fn row(name: &str, value: String) -> Vec<String> {
    vec![name.to_string(), value]
}

fn outcome_label(outcome: TestOutcome) -> String {
    match outcome {
        TestOutcome::Pass => "Pass".green().to_string(),
        TestOutcome::Fail => "Fail".red().to_string(),
        TestOutcome::CompileFail => "CompileFail".red().to_string(),
        TestOutcome::Skip => "Skip".yellow().to_string(),
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", format!("=== {}", title).bold());
}

/// Left-aligned columns separated by two spaces.
///
/// Widths ignore ANSI escapes so colored cells still line up.
pub(crate) fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(visible_width(cell));
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        out.push_str(cell);
        if i < last {
            let pad = widths[i].saturating_sub(visible_width(cell)) + 2;
            out.push_str(&" ".repeat(pad));
        }
    }
    out.push('\n');
}

fn visible_width(cell: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in cell.chars() {
        match (in_escape, c) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}
