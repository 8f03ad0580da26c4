//! Events flowing into and out of the store
//!
//! `UpdateEvent` is what the transport delivers (asynchronously, marshalled
//! onto the control thread). `NetworkEvent` is what observers receive.

use std::collections::BTreeMap;

use entity_table::PropertyValue;
use serde::{Deserialize, Serialize};

use crate::model::{ConnectionState, ManagedType};

/// Raw property dictionary as delivered by the service
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Manager-level properties that are replaced wholesale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerProperty {
    AvailableTechnologies,
    EnabledTechnologies,
}

/// One update delivered by the transport
///
/// ```rust
/// use netsync_state::UpdateEvent;
///
/// let event: UpdateEvent = serde_json::from_str(
///     r#"{"event":"single_property","kind":"network","path":"/service/1","key":"State","value":"online"}"#,
/// ).unwrap();
/// assert!(matches!(event, UpdateEvent::SingleProperty { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UpdateEvent {
    /// Authoritative ordered snapshot of all paths of one kind
    ManagedList { kind: ManagedType, paths: Vec<String> },
    /// Full property dump for one entity, usually answering a fetch
    PropertySet {
        kind: ManagedType,
        path: String,
        properties: PropertyMap,
    },
    /// Unsolicited change of one property on an observed entity
    SingleProperty {
        kind: ManagedType,
        path: String,
        key: String,
        value: PropertyValue,
    },
    /// Resolved IP configuration for a network service
    IpAddress {
        service_path: String,
        address: String,
    },
    ManagerProperty {
        property: ManagerProperty,
        values: Vec<String>,
    },
    /// The transport started delivering live changes for `path`
    ObservationStarted { kind: ManagedType, path: String },
}

/// Notification delivered to observers, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NetworkEvent {
    ManagerChanged,
    DeviceListChanged,
    NetworkListChanged { paths: Vec<String> },
    /// `None` when no network is connected
    ActiveNetworkChanged { path: Option<String> },
    ActiveNetworkStateChanged {
        path: String,
        state: ConnectionState,
    },
    NetworkServiceChanged { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_property_set() {
        let json = r#"{
            "event": "property_set",
            "kind": "network",
            "path": "/service/4",
            "properties": {"State": "ready", "Strength": 80, "Connectable": true}
        }"#;
        let event: UpdateEvent = serde_json::from_str(json).unwrap();

        match event {
            UpdateEvent::PropertySet { kind, path, properties } => {
                assert_eq!(kind, ManagedType::Network);
                assert_eq!(path, "/service/4");
                assert_eq!(properties["Strength"], PropertyValue::Number(80.0));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_manager_property() {
        let json = r#"{"event":"manager_property","property":"available_technologies","values":["wifi","cellular"]}"#;
        let event: UpdateEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            UpdateEvent::ManagerProperty {
                property: ManagerProperty::AvailableTechnologies,
                values: vec!["wifi".into(), "cellular".into()],
            }
        );
    }

    #[test]
    fn test_network_event_serialization() {
        let json =
            serde_json::to_string(&NetworkEvent::ActiveNetworkChanged { path: None }).unwrap();
        assert_eq!(json, r#"{"event":"active_network_changed","path":null}"#);
    }
}
