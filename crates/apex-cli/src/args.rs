//! CLI argument definitions using clap
//!
//! - apex run test [selection] [flags]    # Start a test run
//! - apex get test --test-run-id <id>     # Report an earlier asynchronous run

use apex_core::{ReportOptions, ResultFormat, RunFlags, TestLevel, TestSpecifier};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Longest `--wait` accepted, one week in minutes
pub const MAX_WAIT_MINUTES: u64 = 7 * 24 * 60;

#[derive(Parser, Debug)]
#[command(name = "apex")]
#[command(about = "Run Apex tests in a remote org and report the results")]
#[command(version)]
pub struct Cli {
    /// Print a machine-readable JSON envelope on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file (defaults to ~/.apex/config.json)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Logging level, overridden by RUST_LOG
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub loglevel: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start runs
    Run {
        #[command(subcommand)]
        target: RunTarget,
    },

    /// Retrieve results
    Get {
        #[command(subcommand)]
        target: GetTarget,
    },
}

#[derive(Subcommand, Debug)]
pub enum RunTarget {
    /// Invoke Apex tests in an org
    Test(RunTestArgs),
}

#[derive(Subcommand, Debug)]
pub enum GetTarget {
    /// Display results of an asynchronous test run
    Test(GetTestArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Directive for `EnvFilter`; `fatal` has no tracing level of its own
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Fatal => "error",
        }
    }
}

/// Org selection shared by every command that talks to the service
#[derive(Args, Debug, Clone, Default)]
pub struct OrgArgs {
    /// Alias of the org to run against
    #[arg(short = 'o', long)]
    pub target_org: Option<String>,

    /// Override the API version used for requests
    #[arg(long)]
    pub api_version: Option<String>,
}

/// Rendering flags shared by `run test` and `get test`
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Retrieve code coverage results
    #[arg(short = 'c', long)]
    pub code_coverage: bool,

    /// Display detailed code coverage per test
    #[arg(short = 'v', long, requires = "code_coverage")]
    pub detailed_coverage: bool,

    /// Format of the test results
    #[arg(short = 'r', long, value_parser = parse_result_format)]
    pub result_format: Option<ResultFormat>,

    /// Directory in which to store test run files
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Display only failed test results in human output
    #[arg(long)]
    pub concise: bool,
}

impl ReportArgs {
    pub fn report_options(&self, json_enabled: bool) -> ReportOptions {
        ReportOptions {
            result_format: self.result_format,
            code_coverage: self.code_coverage,
            detailed_coverage: self.detailed_coverage,
            concise: self.concise,
            json_enabled,
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("selection")
        .args(["tests", "class_names", "suite_names"])
        .multiple(false)
))]
pub struct RunTestArgs {
    /// Apex test class names or IDs, or Class.method names, to run
    #[arg(short = 't', long, value_delimiter = ',')]
    pub tests: Vec<String>,

    /// Apex test class names or IDs to run
    #[arg(short = 'n', long, value_delimiter = ',')]
    pub class_names: Vec<String>,

    /// Apex test suite names or IDs to run
    #[arg(short = 's', long, value_delimiter = ',')]
    pub suite_names: Vec<String>,

    /// Level of tests to run
    #[arg(short = 'l', long, value_parser = parse_test_level)]
    pub test_level: Option<TestLevel>,

    /// Run tests from a single class synchronously
    #[arg(short = 'y', long)]
    pub synchronous: bool,

    /// Minutes to wait for the run to complete
    #[arg(
        short = 'w',
        long,
        value_name = "MINUTES",
        value_parser = clap::value_parser!(u64).range(0..=MAX_WAIT_MINUTES)
    )]
    pub wait: Option<u64>,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(flatten)]
    pub org: OrgArgs,
}

impl RunTestArgs {
    pub fn specifier(&self) -> TestSpecifier {
        TestSpecifier::new()
            .with_tests(self.tests.iter().cloned())
            .with_class_names(self.class_names.iter().cloned())
            .with_suite_names(self.suite_names.iter().cloned())
    }

    pub fn run_flags(&self) -> RunFlags {
        RunFlags {
            synchronous: self.synchronous,
            test_level: self.test_level,
            code_coverage: self.report.code_coverage,
            result_format: self.report.result_format,
        }
    }

    /// A zero wait is the same as no wait.
    pub fn wait(&self) -> Option<Duration> {
        self.wait
            .filter(|minutes| *minutes > 0)
            .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct GetTestArgs {
    /// ID of the test run
    #[arg(short = 'i', long)]
    pub test_run_id: String,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(flatten)]
    pub org: OrgArgs,
}

fn parse_test_level(value: &str) -> Result<TestLevel, String> {
    value.parse()
}

fn parse_result_format(value: &str) -> Result<ResultFormat, String> {
    value.parse()
}
