//! Cancellation of an in-flight test run
//!
//! One controller exists per command invocation. Its token is cloned into
//! every component that must observe cancellation; the signal handler calls
//! [`CancellationController::trigger`] and the main flow awaits
//! [`CancellationController::settled`] before it lets the process exit.

use crate::error::{ApexError, ApexResult};
use crate::service::TestExecutionService;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Owns the per-invocation cancellation token
#[derive(Debug, Clone)]
pub struct CancellationController {
    /// Requested once a termination signal arrived; never reset
    token: CancellationToken,
    /// Cancelled once the service was told to stop
    settled: CancellationToken,
    triggered: Arc<AtomicBool>,
}

impl CancellationController {
    /// Create a new controller
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            settled: CancellationToken::new(),
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared token handed to the dispatcher and the service
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether cancellation has been requested
    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail with `Cancelled` if cancellation has been requested
    pub fn checkpoint(&self) -> ApexResult<()> {
        if self.is_requested() {
            Err(ApexError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Request cancellation and tell the service to stop.
    ///
    /// Only the first call notifies the service; later calls wait for that
    /// notification to finish.
    pub async fn trigger(&self, service: &dyn TestExecutionService) -> ApexResult<()> {
        if self.triggered.swap(true, Ordering::SeqCst) {
            debug!("cancellation already triggered, waiting for it to settle");
            self.settled.cancelled().await;
            return Ok(());
        }

        info!("cancellation requested, notifying test service");
        self.token.cancel();

        let result = service.cancel().await;
        if let Err(e) = &result {
            warn!("test service did not acknowledge cancellation: {}", e);
        }

        self.settled.cancel();
        result
    }

    /// Resolve once an in-flight cancellation notification has finished.
    ///
    /// Returns immediately when cancellation was never triggered.
    pub async fn settled(&self) {
        if self.triggered.load(Ordering::SeqCst) {
            self.settled.cancelled().await;
        }
    }
}

impl Default for CancellationController {
    fn default() -> Self {
        Self::new()
    }
}
