use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::consolidator::Consolidator;
use crate::shutdown::ShutdownSender;

const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

/// Owns the background task that drives the engine at a fixed delay: each
/// pass runs to completion before the next delay starts, so passes never
/// overlap.
pub struct ConsolidationTrigger {
    shutdown_tx: ShutdownSender,
    handle: JoinHandle<()>,
}

impl ConsolidationTrigger {
    #[must_use]
    pub fn spawn(consolidator: Arc<Consolidator>, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY);
        let handle = tokio::spawn(async move {
            info!(
                "Consolidation trigger running every {}ms",
                interval.as_millis()
            );
            loop {
                tokio::select! {
                    () = tokio::time::sleep(interval) => {
                        consolidator.tick().await;
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });
        ConsolidationTrigger {
            shutdown_tx,
            handle,
        }
    }

    /// Signals the task to stop and waits for it to finish. An in-flight
    /// pass completes first.
    pub async fn shutdown(self) {
        let _send_result = self.shutdown_tx.send(());
        if let Err(err) = self.handle.await {
            warn!("Consolidation trigger task ended abnormally: {}", err);
        }
    }
}
