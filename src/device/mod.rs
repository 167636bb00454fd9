use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

#[cfg(test)]
pub(crate) mod mock;
mod notifier;
#[cfg(feature = "serial")]
mod platform;
mod registry;
mod scanner;

pub use notifier::Notifier;
pub use registry::{DeviceHandle, DeviceRegistry};
pub use scanner::DeviceScanner;

/// A serial endpoint reported by the platform enumeration facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub manufacturer: Option<String>,
    pub product_id: Option<String>,
}

/// Substrings that pick the notification board out of generic serial
/// endpoints. Matched case-insensitively against manufacturer and path.
pub const DEVICE_MARKERS: &[&str] = &["mbed", "micro"];

pub const BAUD_RATE: u32 = 115_200;
pub const SCAN_INTERVAL: Duration = Duration::from_secs(5);
/// Longest a notify call waits for on-demand discovery before giving up.
pub const OPEN_WAIT: Duration = Duration::from_millis(500);
/// One-pulse protocol: the board only cares that a new report exists.
pub const NOTIFY_PAYLOAD: &[u8] = b"1\n";

/// An open connection to one endpoint.
pub trait SerialConnection: Send {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Whether the transport still looks alive. `false` means the peer went
    /// away and the handle must be discarded.
    fn is_open(&self) -> bool;
}

/// Platform serial facility: endpoint enumeration plus opening.
pub trait SerialBackend: Send + Sync {
    fn list(&self) -> Result<Vec<Endpoint>>;
    fn open(&self, path: &str, baud: u32) -> Result<Box<dyn SerialConnection>>;
}

/// The real backend, or `None` when built without serial support. A `None`
/// backend turns the whole subsystem into a permanent no-op.
pub fn platform_backend() -> Option<Arc<dyn SerialBackend>> {
    #[cfg(feature = "serial")]
    {
        Some(Arc::new(platform::SerialportBackend))
    }

    #[cfg(not(feature = "serial"))]
    {
        None
    }
}
