use crate::config::Config;
use crate::device::{DeviceRegistry, Notifier};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: DeviceRegistry,
    pub notifier: Notifier,
}
