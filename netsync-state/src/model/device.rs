//! Device records

use entity_table::{Entity, EntityHandle};

use super::keys;
use super::{ManagedState, ManagedType};

/// A network device (interface) known to the network-management service
#[derive(Debug, Clone)]
pub struct DeviceState {
    managed: ManagedState,
}

impl DeviceState {
    pub fn managed(&self) -> &ManagedState {
        &self.managed
    }

    pub(crate) fn managed_mut(&mut self) -> &mut ManagedState {
        &mut self.managed
    }

    pub fn path(&self) -> &str {
        self.managed.path()
    }

    pub fn device_type(&self) -> Option<&str> {
        self.managed.type_name()
    }

    pub fn name(&self) -> Option<&str> {
        self.managed.name()
    }

    /// Raw hardware address as reported, e.g. "aabbccddeeff"
    pub fn mac_address(&self) -> Option<&str> {
        self.managed.properties().get_str(keys::ADDRESS)
    }

    pub fn powered(&self) -> bool {
        self.managed
            .properties()
            .get_bool(keys::POWERED)
            .unwrap_or(false)
    }

    pub fn scanning(&self) -> bool {
        self.managed
            .properties()
            .get_bool(keys::SCANNING)
            .unwrap_or(false)
    }
}

impl Entity for DeviceState {
    fn create(path: &str, handle: EntityHandle) -> Self {
        Self {
            managed: ManagedState::new(ManagedType::Device, path, handle),
        }
    }

    fn path(&self) -> &str {
        self.managed.path()
    }

    fn handle(&self) -> EntityHandle {
        self.managed.handle()
    }
}
