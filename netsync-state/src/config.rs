//! Configuration for the state store and its control loop

use crate::error::{Result, StateError};
use crate::model::keys;

/// Configuration for `StateStore` and `ControlLoop`
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Ask the transport for a scan whenever callers list networks
    /// Default: true
    pub scan_on_list: bool,

    /// Capacity of the control loop's update queue
    /// Default: 256
    pub event_buffer_size: usize,

    /// Name given to the control loop thread
    /// Default: "netsync-control"
    pub worker_thread_name: String,

    /// Type name excluded by the empty-type connecting lookup
    /// Default: "ethernet"
    pub ethernet_type: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            scan_on_list: true,
            event_buffer_size: 256,
            worker_thread_name: "netsync-control".to_string(),
            ethernet_type: keys::TYPE_ETHERNET.to_string(),
        }
    }
}

impl HandlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return the first issue found
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(StateError::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.worker_thread_name.trim().is_empty() {
            return Err(StateError::Config(
                "Worker thread name must not be empty".to_string(),
            ));
        }

        if self.ethernet_type.is_empty() {
            return Err(StateError::Config(
                "Ethernet type name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_scan_on_list(mut self, enabled: bool) -> Self {
        self.scan_on_list = enabled;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.worker_thread_name = name.into();
        self
    }
}
