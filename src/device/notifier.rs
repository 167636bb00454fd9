use std::sync::Arc;

use log::{debug, error, info};
use tokio::time::timeout;

use super::{DeviceRegistry, DeviceScanner, NOTIFY_PAYLOAD, OPEN_WAIT};

/// Best-effort delivery of the "new report" pulse to the connected board.
#[derive(Clone)]
pub struct Notifier {
    scanner: Arc<DeviceScanner>,
    registry: DeviceRegistry,
}

impl Notifier {
    pub fn new(scanner: Arc<DeviceScanner>, registry: DeviceRegistry) -> Self {
        Self { scanner, registry }
    }

    /// Sends the fixed pulse. Never fails the caller: no serial support, no
    /// device, and write errors all degrade to a log line.
    pub async fn notify(&self) {
        self.send(NOTIFY_PAYLOAD).await;
    }

    pub async fn send(&self, message: &[u8]) {
        if !self.scanner.available() {
            return;
        }

        let mut current = self.registry.current().await;
        if current.as_ref().is_some_and(|h| !h.conn.is_open()) {
            debug!("current serial handle is stale, discarding");
            current.take();
        }
        if current.is_none() {
            drop(current);
            // Bridge the gap between periodic and demand-driven discovery,
            // but never stall the request past the deadline.
            if timeout(OPEN_WAIT, self.scanner.scan_once()).await.is_err() {
                debug!("on-demand serial discovery timed out");
                return;
            }
            current = self.registry.current().await;
        }

        let Some(handle) = current.as_mut() else {
            return;
        };
        match handle.conn.write_all(message) {
            Ok(()) => info!("notified device on {}", handle.path),
            Err(e) => error!("failed to write to serial device {}: {e}", handle.path),
        }
    }
}
