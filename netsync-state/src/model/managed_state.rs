//! Common core shared by devices and network services

use entity_table::{EntityHandle, PropertyBag};

use super::keys;
use super::ManagedType;

/// Path, identity and raw properties of one managed entity
///
/// The kind never changes after creation. Properties are only mutated by
/// the property differ on behalf of the store.
#[derive(Debug, Clone)]
pub struct ManagedState {
    kind: ManagedType,
    path: String,
    handle: EntityHandle,
    properties: PropertyBag,
    is_observed: bool,
}

impl ManagedState {
    pub(crate) fn new(kind: ManagedType, path: &str, handle: EntityHandle) -> Self {
        Self {
            kind,
            path: path.to_string(),
            handle,
            properties: PropertyBag::new(),
            is_observed: false,
        }
    }

    pub fn kind(&self) -> ManagedType {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Identity of this record; survives reordering, not removal
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub(crate) fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    /// Whether the transport is watching this entity for live changes
    pub fn is_observed(&self) -> bool {
        self.is_observed
    }

    pub(crate) fn set_observed(&mut self, observed: bool) {
        self.is_observed = observed;
    }

    /// The "Type" property, e.g. "wifi" or "ethernet"
    pub fn type_name(&self) -> Option<&str> {
        self.properties.get_str(keys::TYPE)
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get_str(keys::NAME)
    }
}
