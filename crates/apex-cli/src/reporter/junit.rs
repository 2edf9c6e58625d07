//! JUnit XML output

use apex_core::DetailedResult;
use apex_core::model::TestOutcome;
use std::fmt::Write;

pub fn render(result: &DetailedResult) -> String {
    let summary = &result.summary;
    let mut out = String::new();

    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(out, "<testsuites>");
    let _ = writeln!(
        out,
        r#"    <testsuite name="force.apex" timestamp="{}" tests="{}" failures="{}" errors="0" skipped="{}" time="{}">"#,
        summary.test_start_time.to_rfc3339(),
        summary.tests_ran,
        summary.failing,
        summary.skipped,
        seconds(summary.test_execution_time_in_ms),
    );

    let _ = writeln!(out, "        <properties>");
    let properties = [
        ("outcome", format!("{:?}", summary.outcome)),
        ("testsRan", summary.tests_ran.to_string()),
        ("passing", summary.passing.to_string()),
        ("failing", summary.failing.to_string()),
        ("skipped", summary.skipped.to_string()),
        ("passRate", summary.pass_rate.clone()),
        ("failRate", summary.fail_rate.clone()),
        ("testRunId", summary.test_run_id.clone()),
        ("orgId", summary.org_id.clone()),
        ("username", summary.username.clone()),
    ];
    for (name, value) in properties {
        let _ = writeln!(
            out,
            r#"            <property name="{}" value="{}"/>"#,
            name,
            escape(&value)
        );
    }
    let _ = writeln!(out, "        </properties>");

    for test in &result.tests {
        let open = format!(
            r#"        <testcase name="{}" classname="{}" time="{}""#,
            escape(&test.method_name),
            escape(&test.apex_class.name),
            seconds(test.run_time)
        );
        match test.outcome {
            TestOutcome::Pass => {
                let _ = writeln!(out, "{}/>", open);
            }
            TestOutcome::Skip => {
                let _ = writeln!(out, "{}>", open);
                let _ = writeln!(out, "            <skipped/>");
                let _ = writeln!(out, "        </testcase>");
            }
            TestOutcome::Fail | TestOutcome::CompileFail => {
                let _ = writeln!(out, "{}>", open);
                let message = test.message.as_deref().unwrap_or_default();
                let _ = writeln!(
                    out,
                    r#"            <failure message="{}"><![CDATA[{}]]></failure>"#,
                    escape(message),
                    cdata(test.stack_trace.as_deref().unwrap_or_default())
                );
                let _ = writeln!(out, "        </testcase>");
            }
        }
    }

    let _ = writeln!(out, "    </testsuite>");
    let _ = writeln!(out, "</testsuites>");
    out
}

fn seconds(ms: u64) -> String {
    format!("{:.2}", ms as f64 / 1000.0)
}

/// Escape text for use inside an XML attribute
pub(crate) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// CDATA sections cannot contain their own terminator
fn cdata(value: &str) -> String {
    value.replace("]]>", "]]]]><![CDATA[>")
}
