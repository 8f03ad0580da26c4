//! Network service records

use entity_table::{Entity, EntityHandle};

use super::keys;
use super::{ConnectionState, ManagedState, ManagedType};

/// A network service: something the host can connect to
#[derive(Debug, Clone)]
pub struct NetworkState {
    managed: ManagedState,
    /// Resolved through a follow-up IP configuration lookup, never from
    /// the service's own property payload
    ip_address: Option<String>,
}

impl NetworkState {
    pub fn managed(&self) -> &ManagedState {
        &self.managed
    }

    pub(crate) fn managed_mut(&mut self) -> &mut ManagedState {
        &mut self.managed
    }

    pub fn path(&self) -> &str {
        self.managed.path()
    }

    pub fn name(&self) -> Option<&str> {
        self.managed.name()
    }

    pub fn network_type(&self) -> Option<&str> {
        self.managed.type_name()
    }

    /// Parsed "State" property; `Idle` until the first state arrives
    pub fn connection_state(&self) -> ConnectionState {
        self.managed
            .properties()
            .get_str(keys::STATE)
            .map(ConnectionState::from_service_state)
            .unwrap_or_default()
    }

    pub fn is_connected_state(&self) -> bool {
        self.connection_state().is_connected()
    }

    pub fn is_connecting_state(&self) -> bool {
        self.connection_state().is_connecting()
    }

    /// Path of the device carrying this service
    pub fn device_path(&self) -> Option<&str> {
        self.managed.properties().get_str(keys::DEVICE)
    }

    pub fn signal_strength(&self) -> Option<u8> {
        self.managed
            .properties()
            .get_f64(keys::STRENGTH)
            .map(|s| s.clamp(0.0, 100.0) as u8)
    }

    pub fn security(&self) -> Option<&str> {
        self.managed.properties().get_str(keys::SECURITY)
    }

    pub fn error(&self) -> Option<&str> {
        self.managed.properties().get_str(keys::ERROR)
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub(crate) fn set_ip_address(&mut self, address: &str) {
        self.ip_address = Some(address.to_string());
    }
}

impl Entity for NetworkState {
    fn create(path: &str, handle: EntityHandle) -> Self {
        Self {
            managed: ManagedState::new(ManagedType::Network, path, handle),
            ip_address: None,
        }
    }

    fn path(&self) -> &str {
        self.managed.path()
    }

    fn handle(&self) -> EntityHandle {
        self.managed.handle()
    }
}
