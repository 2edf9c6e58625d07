//! Printing command results and errors, and choosing the exit status

use crate::console::CliConsole;
use apex_core::{ApexError, CommandResult};
use serde_json::{Value, json};

/// JSON envelope for a successful command
pub fn result_envelope(result: &CommandResult) -> Value {
    match result {
        CommandResult::Report(output) => json!({
            "status": output.exit_code,
            "result": output.json,
        }),
        CommandResult::RunId { result, guidance } => json!({
            "status": 0,
            "result": result,
            "warnings": guidance,
        }),
    }
}

/// JSON envelope for a failed command
pub fn error_envelope(error: &ApexError) -> Value {
    json!({
        "status": error.exit_code(),
        "name": error.error_code(),
        "message": error.to_string(),
        "actions": error.actions(),
    })
}

/// Print the outcome of a command and return the process exit status
pub fn emit(result: Result<CommandResult, ApexError>, json: bool) -> i32 {
    let console = CliConsole::new(json);
    match result {
        Ok(result) => {
            if json {
                print_json(&result_envelope(&result));
            } else {
                match &result {
                    CommandResult::Report(output) => print!("{}", output.rendered),
                    CommandResult::RunId { guidance, .. } => {
                        for line in guidance {
                            console.info(line);
                        }
                    }
                }
            }
            result.exit_code()
        }
        Err(error) => {
            if json {
                print_json(&error_envelope(&error));
            } else {
                console.error(error.error_code(), &error.to_string(), error.actions());
            }
            error.exit_code()
        }
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_core::ReportOutput;
    use apex_core::error::{CANCELLED_EXIT_CODE, FAILURE_EXIT_CODE};
    use apex_core::model::RunIdResult;

    #[test]
    fn test_report_envelope_carries_exit_status() {
        let result = CommandResult::Report(ReportOutput {
            rendered: String::new(),
            json: json!({"summary": {"outcome": "Failed"}}),
            exit_code: FAILURE_EXIT_CODE,
        });

        let envelope = result_envelope(&result);
        assert_eq!(envelope["status"], FAILURE_EXIT_CODE);
        assert_eq!(envelope["result"]["summary"]["outcome"], "Failed");
    }

    #[test]
    fn test_run_id_envelope() {
        let result = CommandResult::RunId {
            result: RunIdResult::new("707ABC"),
            guidance: vec!["Run \"apex get test --test-run-id 707ABC\"".to_string()],
        };

        let envelope = result_envelope(&result);
        assert_eq!(envelope["status"], 0);
        assert_eq!(envelope["result"]["testRunId"], "707ABC");
        assert!(envelope["warnings"][0].as_str().unwrap().contains("707ABC"));
    }

    #[test]
    fn test_error_envelope() {
        let error = ApexError::server_with_code("No tests", "INVALID_INPUT")
            .with_message_and_actions("No tests here", vec!["Add tests".to_string()]);

        let envelope = error_envelope(&error);
        assert_eq!(envelope["status"], 1);
        assert_eq!(envelope["name"], "INVALID_INPUT");
        assert_eq!(envelope["message"], "No tests here");
        assert_eq!(envelope["actions"][0], "Add tests");
    }

    #[test]
    fn test_cancelled_exit_status() {
        assert_eq!(emit(Err(ApexError::Cancelled), true), CANCELLED_EXIT_CODE);
    }
}
