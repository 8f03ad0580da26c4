//! Property differ - applies one raw key/value pair to a managed entity
//!
//! The differ mutates state and reports what happened; it never notifies.
//! The store decides which notification (if any) an outcome deserves,
//! since that can depend on context such as the active network.

use entity_table::PropertyValue;

use crate::error::Anomaly;
use crate::model::{keys, ManagedState, ManagedType};

/// Result of applying a single property
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// The stored value changed (or the key was new)
    Changed,
    /// The stored value already matched
    Unchanged,
    /// The key references an IP configuration object that must be fetched;
    /// nothing was stored
    FetchIpConfig(String),
    /// The value was rejected; nothing was stored
    Skipped(Anomaly),
}

impl DiffOutcome {
    /// Whether externally visible state changed
    pub fn changed(&self) -> bool {
        matches!(self, DiffOutcome::Changed)
    }
}

/// Stateless differ over `ManagedState`
pub struct PropertyDiffer;

impl PropertyDiffer {
    /// Apply `key = value` to `state`
    ///
    /// Null values are skipped for every key, and known keys are checked
    /// against their expected value type. On network services the IP
    /// configuration key is diverted into a `FetchIpConfig` outcome instead
    /// of being stored.
    pub fn apply(state: &mut ManagedState, key: &str, value: &PropertyValue) -> DiffOutcome {
        if value.is_null() {
            return DiffOutcome::Skipped(Anomaly::NullValue {
                key: key.to_string(),
            });
        }

        if let Some(expected) = keys::expected_kind(key) {
            let found = value.kind();
            if found != expected {
                return DiffOutcome::Skipped(Anomaly::UnexpectedType {
                    key: key.to_string(),
                    expected,
                    found,
                });
            }
        }

        if state.kind() == ManagedType::Network && key == keys::IP_CONFIG {
            return match value.as_str() {
                Some(ip_config_path) if !ip_config_path.is_empty() => {
                    DiffOutcome::FetchIpConfig(ip_config_path.to_string())
                }
                _ => DiffOutcome::Skipped(Anomaly::EmptyIpConfig {
                    path: state.path().to_string(),
                }),
            };
        }

        if state.properties_mut().set(key, value.clone()) {
            DiffOutcome::Changed
        } else {
            DiffOutcome::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_table::{EntityTable, ValueKind};

    use crate::model::{DeviceState, NetworkState};

    fn network() -> NetworkState {
        EntityTable::<NetworkState>::new().upsert("/service/1").clone()
    }

    #[test]
    fn test_unchanged_value_reports_false() {
        let mut network = network();
        let state = network.managed_mut();

        let first = PropertyDiffer::apply(state, keys::NAME, &PropertyValue::from("home"));
        let second = PropertyDiffer::apply(state, keys::NAME, &PropertyValue::from("home"));

        assert!(first.changed());
        assert_eq!(second, DiffOutcome::Unchanged);
        assert!(!second.changed());
    }

    #[test]
    fn test_changed_value_is_retrievable() {
        let mut network = network();
        PropertyDiffer::apply(network.managed_mut(), keys::STATE, &"idle".into());
        let outcome = PropertyDiffer::apply(network.managed_mut(), keys::STATE, &"online".into());

        assert!(outcome.changed());
        assert!(network.is_connected_state());
    }

    #[test]
    fn test_nested_values_compare_by_content() {
        let mut network = network();
        let servers = PropertyValue::from(vec!["1.1.1.1", "9.9.9.9"]);
        PropertyDiffer::apply(network.managed_mut(), "Nameservers", &servers);

        let same = PropertyValue::List(vec!["1.1.1.1".into(), "9.9.9.9".into()]);
        let outcome = PropertyDiffer::apply(network.managed_mut(), "Nameservers", &same);
        assert_eq!(outcome, DiffOutcome::Unchanged);
    }

    #[test]
    fn test_ip_config_is_diverted() {
        let mut network = network();
        let outcome =
            PropertyDiffer::apply(network.managed_mut(), keys::IP_CONFIG, &"/ipconfig/3".into());

        assert_eq!(outcome, DiffOutcome::FetchIpConfig("/ipconfig/3".to_string()));
        assert!(!outcome.changed());
        assert!(!network.managed().properties().contains(keys::IP_CONFIG));
    }

    #[test]
    fn test_empty_ip_config_is_skipped() {
        let mut network = network();
        let outcome = PropertyDiffer::apply(network.managed_mut(), keys::IP_CONFIG, &"".into());
        assert!(matches!(outcome, DiffOutcome::Skipped(Anomaly::EmptyIpConfig { .. })));
    }

    #[test]
    fn test_ip_config_on_device_is_stored() {
        let mut device = EntityTable::<DeviceState>::new().upsert("/device/eth0").clone();
        let outcome =
            PropertyDiffer::apply(device.managed_mut(), keys::IP_CONFIG, &"/ipconfig/1".into());
        assert!(outcome.changed());
    }

    #[test]
    fn test_wrong_type_is_skipped_without_storing() {
        let mut network = network();
        let outcome =
            PropertyDiffer::apply(network.managed_mut(), keys::STRENGTH, &"strong".into());

        assert_eq!(
            outcome,
            DiffOutcome::Skipped(Anomaly::UnexpectedType {
                key: keys::STRENGTH.to_string(),
                expected: ValueKind::Number,
                found: ValueKind::String,
            })
        );
        assert!(network.signal_strength().is_none());
    }

    #[test]
    fn test_null_is_skipped_for_any_key() {
        let mut network = network();
        let state = network.managed_mut();
        PropertyDiffer::apply(state, "Proxy", &"direct".into());

        for key in [keys::NAME, "Proxy"] {
            let outcome = PropertyDiffer::apply(state, key, &PropertyValue::Null);
            assert_eq!(
                outcome,
                DiffOutcome::Skipped(Anomaly::NullValue {
                    key: key.to_string()
                })
            );
        }
        // The earlier value is left in place
        assert_eq!(state.properties().get_str("Proxy"), Some("direct"));
    }
}
