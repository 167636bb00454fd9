use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::SerialConnection;

/// An open, owned connection to one endpoint. At most one handle exists
/// process-wide; the registry owns it.
pub struct DeviceHandle {
    pub path: String,
    pub conn: Box<dyn SerialConnection>,
}

/// Holds the single current device handle. Every transition happens under
/// one guard, so a reader never observes a handle that a concurrent scan
/// has already closed.
#[derive(Clone)]
pub struct DeviceRegistry {
    slot: Arc<Mutex<Option<DeviceHandle>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Locks the current-handle slot. Replacing the content installs a new
    /// handle; taking it clears the registry and closes the connection.
    pub async fn current(&self) -> MutexGuard<'_, Option<DeviceHandle>> {
        self.slot.lock().await
    }

    /// Path of the connected device, if any.
    pub async fn connected_path(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|h| h.path.clone())
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
