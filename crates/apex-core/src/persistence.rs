//! Result file persistence
//!
//! Files written into the output directory:
//! - `test-run-id.txt` - the bare run id, always
//! - `test-result-<runId>.json` - the full result, for finished runs
//! - `test-result-codecoverage.json` - coverage records, when coverage was requested

use crate::error::{ApexResult, ResultExt};
use crate::model::TestRunOutcome;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Name of the run id marker file
pub const TEST_RUN_ID_FILE: &str = "test-run-id.txt";

/// Name of the coverage file
pub const COVERAGE_FILE: &str = "test-result-codecoverage.json";

/// Name of the result file for `run_id`
pub fn result_file_name(run_id: &str) -> String {
    format!("test-result-{}.json", run_id)
}

/// Write result files for `outcome` into `output_dir`, creating it if needed.
///
/// A run that has not finished yet has no coverage data, so only the run id
/// marker is written for it.
pub async fn write_result_files(
    outcome: &TestRunOutcome,
    output_dir: &Path,
    code_coverage: bool,
) -> ApexResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .await
        .persistence_context(output_dir.display().to_string())?;

    let mut written = Vec::new();

    let run_id_path = output_dir.join(TEST_RUN_ID_FILE);
    write_file(&run_id_path, outcome.test_run_id().as_bytes()).await?;
    written.push(run_id_path);

    if let TestRunOutcome::Detailed(result) = outcome {
        let result_path = output_dir.join(result_file_name(&result.summary.test_run_id));
        let content = serde_json::to_vec_pretty(result)
            .persistence_context(result_path.display().to_string())?;
        write_file(&result_path, &content).await?;
        written.push(result_path);

        if code_coverage {
            if let Some(coverage) = &result.code_coverage {
                let coverage_path = output_dir.join(COVERAGE_FILE);
                let content = serde_json::to_vec_pretty(coverage)
                    .persistence_context(coverage_path.display().to_string())?;
                write_file(&coverage_path, &content).await?;
                written.push(coverage_path);
            }
        }
    }

    debug!("Wrote {} result file(s) to {:?}", written.len(), output_dir);
    Ok(written)
}

async fn write_file(path: &Path, content: &[u8]) -> ApexResult<()> {
    fs::write(path, content)
        .await
        .persistence_context(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApexError;
    use crate::model::result::fixtures::failed_result;
    use crate::model::{CoverageRecord, RunIdResult};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_id_marker_contains_only_the_id() {
        let dir = TempDir::new().unwrap();
        let outcome = TestRunOutcome::RunId(RunIdResult::new("707000000000123"));

        let written = write_result_files(&outcome, dir.path(), true).await.unwrap();

        assert_eq!(written, vec![dir.path().join(TEST_RUN_ID_FILE)]);
        let content = std::fs::read_to_string(dir.path().join(TEST_RUN_ID_FILE)).unwrap();
        assert_eq!(content, "707000000000123");
    }

    #[tokio::test]
    async fn test_detailed_result_writes_result_and_coverage() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("results");
        let mut result = failed_result("7072");
        result.code_coverage = Some(vec![CoverageRecord {
            apex_id: "01p2".to_string(),
            name: "AccountService".to_string(),
            kind: "ApexClass".to_string(),
            percentage: "75%".to_string(),
            num_lines_covered: 3,
            num_lines_uncovered: 1,
            uncovered_lines: vec![12],
        }]);

        let written = write_result_files(&TestRunOutcome::Detailed(result), &out, true)
            .await
            .unwrap();

        assert_eq!(written.len(), 3);
        assert!(out.join("test-result-7072.json").exists());
        assert!(out.join(COVERAGE_FILE).exists());
    }

    #[tokio::test]
    async fn test_coverage_skipped_when_not_requested() {
        let dir = TempDir::new().unwrap();
        let written = write_result_files(
            &TestRunOutcome::Detailed(failed_result("7073")),
            dir.path(),
            false,
        )
        .await
        .unwrap();
        assert_eq!(written.len(), 2);
        assert!(!dir.path().join(COVERAGE_FILE).exists());
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_a_persistence_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let err = write_result_files(
            &TestRunOutcome::RunId(RunIdResult::new("707")),
            &blocker.join("sub"),
            false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApexError::Persistence { .. }));
    }
}
