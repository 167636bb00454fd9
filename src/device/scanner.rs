use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::time::interval;

use super::{
    BAUD_RATE, DEVICE_MARKERS, DeviceHandle, DeviceRegistry, Endpoint, SCAN_INTERVAL,
    SerialBackend,
};

/// Periodic discovery: enumerates serial endpoints, picks the most plausible
/// board, and keeps the registry pointed at an open handle for it.
pub struct DeviceScanner {
    backend: Option<Arc<dyn SerialBackend>>,
    registry: DeviceRegistry,
}

impl DeviceScanner {
    pub fn new(backend: Option<Arc<dyn SerialBackend>>, registry: DeviceRegistry) -> Self {
        Self { backend, registry }
    }

    pub fn available(&self) -> bool {
        self.backend.is_some()
    }

    /// Runs one discovery pass. Safe to race with notify calls; the registry
    /// guard is held across the whole transition.
    pub async fn scan_once(&self) {
        let Some(backend) = self.backend.clone() else {
            return;
        };

        let listed = {
            let backend = backend.clone();
            tokio::task::spawn_blocking(move || backend.list()).await
        };
        let endpoints = match listed {
            Ok(Ok(endpoints)) => endpoints,
            Ok(Err(e)) => {
                warn!("serial enumeration failed: {e:#}");
                return;
            }
            Err(e) => {
                warn!("serial enumeration task failed: {e}");
                return;
            }
        };

        let mut current = self.registry.current().await;

        // A handle whose transport died since the last pass is already gone.
        if current.as_ref().is_some_and(|h| !h.conn.is_open()) {
            warn!("serial device disconnected");
            current.take();
        }

        let Some(candidate) = select_candidate(&endpoints) else {
            debug!("no serial endpoints found");
            return;
        };

        if current.as_ref().is_some_and(|h| h.path == candidate.path) {
            return;
        }

        if let Some(old) = current.take() {
            debug!("closing serial device on {}", old.path);
            drop(old);
        }

        let path = candidate.path.clone();
        let opened = {
            let backend = backend.clone();
            let path = path.clone();
            tokio::task::spawn_blocking(move || backend.open(&path, BAUD_RATE)).await
        };
        match opened {
            Ok(Ok(conn)) => {
                info!("serial device connected on {path}");
                *current = Some(DeviceHandle { path, conn });
            }
            Ok(Err(e)) => error!("failed to open serial port {path}: {e:#}"),
            Err(e) => error!("serial open task failed: {e}"),
        }
    }

    /// Drives periodic discovery for the life of the process.
    pub async fn run(&self) {
        if !self.available() {
            return;
        }
        let mut ticker = interval(SCAN_INTERVAL);
        loop {
            ticker.tick().await;
            self.scan_once().await;
        }
    }
}

/// Candidate precedence: first endpoint whose manufacturer or path contains
/// a known marker, else the first endpoint in enumeration order, else none.
pub fn select_candidate(endpoints: &[Endpoint]) -> Option<&Endpoint> {
    endpoints
        .iter()
        .find(|e| {
            let manufacturer = e.manufacturer.as_deref().unwrap_or("").to_lowercase();
            let path = e.path.to_lowercase();
            DEVICE_MARKERS
                .iter()
                .any(|marker| manufacturer.contains(marker) || path.contains(marker))
        })
        .or_else(|| endpoints.first())
}
