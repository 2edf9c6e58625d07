//! Termination signal handling for a test run
//!
//! SIGINT and SIGTERM are routed to the invocation's
//! [`CancellationController`]. The first signal asks the service to stop the
//! run, waits for that request to finish, then exits with status 130.

use apex_core::error::CANCELLED_EXIT_CODE;
use apex_core::{ApexError, ApexResult, CancellationController, TestExecutionService};
use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::{Handle, Signals};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Handlers may only be installed once per process
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Keeps the signal task alive; dropping it stops signal handling
pub struct SignalGuard {
    handle: Handle,
    task: Option<JoinHandle<()>>,
}

impl SignalGuard {
    /// Whether the signal task is still listening
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        INSTALLED.store(false, Ordering::SeqCst);
    }
}

/// Install SIGINT and SIGTERM handlers that cancel through `controller`
pub fn install(
    controller: CancellationController,
    service: Arc<dyn TestExecutionService>,
) -> ApexResult<SignalGuard> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(ApexError::config("Signal handlers are already installed"));
    }

    let signals = match Signals::new([SIGINT, SIGTERM]) {
        Ok(signals) => signals,
        Err(e) => {
            INSTALLED.store(false, Ordering::SeqCst);
            return Err(ApexError::config(format!(
                "Failed to install signal handlers: {}",
                e
            )));
        }
    };
    let handle = signals.handle();

    let task = tokio::spawn(listen(signals, controller, service));
    debug!("signal handlers installed");

    Ok(SignalGuard {
        handle,
        task: Some(task),
    })
}

async fn listen(
    mut signals: Signals,
    controller: CancellationController,
    service: Arc<dyn TestExecutionService>,
) {
    let Some(signal) = signals.next().await else {
        return;
    };

    warn!(signal, "termination signal received");
    eprintln!("\nCancelling test run...");

    if let Err(e) = controller.trigger(service.as_ref()).await {
        eprintln!("Could not cancel the test run: {}", e);
    }
    std::process::exit(CANCELLED_EXIT_CODE);
}
