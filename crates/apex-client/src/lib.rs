//! HTTP test execution service for Apex Runner
//!
//! Speaks a small JSON contract under
//! `{instance_url}/services/data/v{api}/tooling/`:
//! - `POST runTestsSynchronous` - run and return the full result
//! - `POST runTestsAsynchronous` - enqueue and return the run id
//! - `GET testRuns/{id}` - status, plus the result once completed
//! - `POST testRuns/{id}/abort` - stop a run

mod error_utils;
mod service;
mod status;


pub use error_utils::error_from_body;
pub use service::HttpTestService;
pub use status::{RunStatus, TestRunStatus};
