//! Network state store - the single owner of all device and network state
//!
//! The store mirrors the network-management service. Three feeds arrive
//! from the transport (managed lists, property sets, single properties)
//! and are applied here against two entity tables. Each applied update is
//! one cycle: mutate first, then notify observers in emission order.
//!
//! # Architecture
//!
//! ```text
//! StateStore
//! ├── devices:  EntityTable<DeviceState>   (service order, never re-sorted)
//! ├── networks: EntityTable<NetworkState>  (connected, connecting, rest)
//! ├── available/enabled technologies       (replaced wholesale)
//! ├── active_network_path                  (first network when connected)
//! ├── pending/stale fetches                (per (kind, path) bookkeeping)
//! ├── transport: Box<dyn PropertyTransport>
//! └── observers: ObserverList
//! ```
//!
//! All entry points take `&mut self` and run on one control thread; see
//! `ControlLoop` for marshalling updates from other threads.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use entity_table::{EntityTable, PropertyValue};

use crate::config::HandlerConfig;
use crate::differ::{DiffOutcome, PropertyDiffer};
use crate::error::{Anomaly, Result};
use crate::event::{ManagerProperty, NetworkEvent, PropertyMap, UpdateEvent};
use crate::model::{keys, DeviceState, ManagedState, ManagedType, NetworkState};
use crate::observer::{NetworkStateObserver, ObserverId, ObserverList};
use crate::transport::PropertyTransport;

type FetchKey = (ManagedType, String);

/// What a batch of properties did to one entity
#[derive(Debug, Default, Clone, Copy)]
struct PropertyChanges {
    changed: bool,
    state_changed: bool,
}

/// Authoritative in-memory model of network devices and services
pub struct StateStore {
    devices: EntityTable<DeviceState>,
    networks: EntityTable<NetworkState>,
    available_technologies: HashSet<String>,
    enabled_technologies: HashSet<String>,
    active_network_path: Option<String>,
    /// Property fetches issued and not yet answered
    pending_fetches: HashSet<FetchKey>,
    /// Fetches whose entity was removed by the latest list cycle of its kind
    /// before the answer arrived
    stale_fetches: HashSet<FetchKey>,
    transport: Box<dyn PropertyTransport>,
    observers: ObserverList,
    config: HandlerConfig,
}

impl StateStore {
    /// Create an empty store talking through `transport`
    pub fn new<T>(transport: T, config: HandlerConfig) -> Result<Self>
    where
        T: PropertyTransport + 'static,
    {
        config.validate()?;

        Ok(Self {
            devices: EntityTable::new(),
            networks: EntityTable::new(),
            available_technologies: HashSet::new(),
            enabled_technologies: HashSet::new(),
            active_network_path: None,
            pending_fetches: HashSet::new(),
            stale_fetches: HashSet::new(),
            transport: Box::new(transport),
            observers: ObserverList::new(),
            config,
        })
    }

    /// Ask the transport for the initial device and network lists
    pub fn init(&self) {
        tracing::info!("Requesting initial device and network lists");
        self.transport.request_managed_list(ManagedType::Device);
        self.transport.request_managed_list(ManagedType::Network);
    }

    /// Drop every entity, all fetch bookkeeping and every observer
    pub fn teardown(&mut self) {
        tracing::info!(
            "Tearing down state store ({} devices, {} networks)",
            self.devices.len(),
            self.networks.len()
        );
        self.devices.clear();
        self.networks.clear();
        self.available_technologies.clear();
        self.enabled_technologies.clear();
        self.active_network_path = None;
        self.pending_fetches.clear();
        self.stale_fetches.clear();
        self.observers.clear();
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    // ========================================================================
    // Observers
    // ========================================================================

    pub fn add_observer(&mut self, observer: Arc<dyn NetworkStateObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn technology_available(&self, technology: &str) -> bool {
        self.available_technologies.contains(technology)
    }

    pub fn technology_enabled(&self, technology: &str) -> bool {
        self.enabled_technologies.contains(technology)
    }

    pub fn device(&self, path: &str) -> Option<&DeviceState> {
        self.devices.lookup(path)
    }

    /// First device of `device_type` in service order
    pub fn device_by_type(&self, device_type: &str) -> Option<&DeviceState> {
        self.devices.find(|d| d.device_type() == Some(device_type))
    }

    pub fn devices(&self) -> impl Iterator<Item = &DeviceState> {
        self.devices.iter()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn network(&self, path: &str) -> Option<&NetworkState> {
        self.networks.lookup(path)
    }

    /// Networks in priority order, without side effects
    pub fn networks(&self) -> impl Iterator<Item = &NetworkState> {
        self.networks.iter()
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Ordered snapshot of all networks
    ///
    /// Also asks the transport for a scan when `scan_on_list` is set, so
    /// callers listing networks get fresher results on the next cycle.
    pub fn network_list(&self) -> Vec<&NetworkState> {
        if self.config.scan_on_list {
            self.transport.request_scan();
        }
        self.networks.iter().collect()
    }

    /// The first network when it is connected
    pub fn active_network(&self) -> Option<&NetworkState> {
        self.networks.first().filter(|n| n.is_connected_state())
    }

    /// Path recorded at the end of the last network list cycle
    pub fn active_network_path(&self) -> Option<&str> {
        self.active_network_path.as_deref()
    }

    /// First connected network of `network_type`
    pub fn connected_network_by_type(&self, network_type: &str) -> Option<&NetworkState> {
        for network in &self.networks {
            if !network.is_connected_state() {
                // Connected networks are listed first
                break;
            }
            if network.network_type() == Some(network_type) {
                return Some(network);
            }
        }
        None
    }

    /// First connecting network of `network_type`
    ///
    /// An empty `network_type` matches any connecting network whose type is
    /// not `config.ethernet_type`. Upstream connection managers compare the
    /// query string against ethernet instead, so there an empty query also
    /// matches a connecting ethernet service; excluding ethernet here is
    /// deliberate.
    pub fn connecting_network_by_type(&self, network_type: &str) -> Option<&NetworkState> {
        for network in &self.networks {
            if network.is_connected_state() {
                continue;
            }
            if !network.is_connecting_state() {
                // Connected and connecting networks are listed first
                break;
            }
            let matches = if network_type.is_empty() {
                network.network_type() != Some(self.config.ethernet_type.as_str())
            } else {
                network.network_type() == Some(network_type)
            };
            if matches {
                return Some(network);
            }
        }
        None
    }

    /// Upper-cased hardware address of the device behind the connected
    /// network of `network_type`
    pub fn hardware_address_for_type(&self, network_type: &str) -> Option<String> {
        let network = self.connected_network_by_type(network_type)?;
        let device = self.device(network.device_path()?)?;
        device.mac_address().map(str::to_ascii_uppercase)
    }

    /// Same as `hardware_address_for_type`, colon separated
    pub fn formatted_hardware_address_for_type(&self, network_type: &str) -> Option<String> {
        self.hardware_address_for_type(network_type)
            .map(|raw| format_hardware_address(&raw))
    }

    // ========================================================================
    // Mutation requests (delegated to the transport)
    // ========================================================================

    pub fn set_technology_enabled(&self, technology: &str, enabled: bool) {
        tracing::debug!("Setting technology {} enabled={}", technology, enabled);
        self.transport.set_technology_enabled(technology, enabled);
    }

    pub fn request_scan(&self) {
        self.transport.request_scan();
    }

    // ========================================================================
    // Update feeds
    // ========================================================================

    /// Apply one transport update
    pub fn apply_event(&mut self, event: UpdateEvent) {
        match event {
            UpdateEvent::ManagedList { kind, paths } => {
                self.apply_managed_list_update(kind, &paths);
            }
            UpdateEvent::PropertySet {
                kind,
                path,
                properties,
            } => {
                self.apply_property_set_update(kind, &path, &properties);
            }
            UpdateEvent::SingleProperty {
                kind,
                path,
                key,
                value,
            } => {
                self.apply_single_property_update(kind, &path, &key, &value);
            }
            UpdateEvent::IpAddress {
                service_path,
                address,
            } => {
                self.apply_ip_address_update(&service_path, &address);
            }
            UpdateEvent::ManagerProperty { property, values } => {
                self.apply_manager_property_update(property, &values);
            }
            UpdateEvent::ObservationStarted { kind, path } => {
                self.apply_observation_started(kind, &path);
            }
        }
    }

    /// Reconcile one table against the service's ordered path list
    ///
    /// New paths are created and fetched, vanished paths are dropped,
    /// surviving entities are kept as-is. Networks are then re-sorted into
    /// priority order and the active network recomputed. List
    /// notifications only fire when the resulting order differs.
    pub fn apply_managed_list_update(&mut self, kind: ManagedType, paths: &[String]) {
        tracing::debug!("Managed list update: {} ({} paths)", kind, paths.len());

        let before = self.paths(kind);
        let report = match kind {
            ManagedType::Device => self.devices.reconcile(paths),
            ManagedType::Network => self.networks.reconcile(paths),
        };

        if report.skipped_empty > 0 {
            tracing::warn!(
                "{}",
                Anomaly::EmptyPath {
                    kind,
                    count: report.skipped_empty
                }
            );
        }
        for path in report.duplicates {
            tracing::warn!("{}", Anomaly::DuplicatePath { kind, path });
        }

        // Stale keys only outlive the cycle that removed their entity
        self.stale_fetches.retain(|(stale_kind, _)| *stale_kind != kind);
        for path in report.removed {
            tracing::debug!("Removed {} {}", kind, path);
            let key = (kind, path);
            if self.pending_fetches.remove(&key) {
                self.stale_fetches.insert(key);
            }
        }

        for entry in report.entries {
            let is_observing = self.transport.is_observing(&entry.path);
            if entry.created {
                tracing::debug!("Added {} {}", kind, entry.path);
            }

            let Some(state) = self.managed_mut(kind, &entry.path) else {
                continue;
            };
            let request = entry.created || (is_observing && !state.is_observed());
            if is_observing {
                state.set_observed(true);
            }
            if request {
                self.request_properties(kind, &entry.path);
            }
        }

        let mut events = Vec::new();
        match kind {
            ManagedType::Device => {
                if self.devices.paths() != before {
                    events.push(NetworkEvent::DeviceListChanged);
                }
            }
            ManagedType::Network => {
                self.networks
                    .reorder_by_key(|n| n.connection_state().priority_bucket());
                self.check_network_ordering();

                let after = self.networks.paths();
                if after != before {
                    events.push(NetworkEvent::NetworkListChanged { paths: after });
                }

                let active = self.active_network().map(|n| n.path().to_string());
                if active != self.active_network_path {
                    tracing::info!("Active network changed: {:?}", active);
                    self.active_network_path = active.clone();
                    events.push(NetworkEvent::ActiveNetworkChanged { path: active });
                }
            }
        }

        self.notify(events);
    }

    /// Apply a full property dump for one entity
    ///
    /// Results for entities removed since the fetch was issued are dropped
    /// quietly; results for paths never seen are logged as anomalies.
    pub fn apply_property_set_update(
        &mut self,
        kind: ManagedType,
        path: &str,
        properties: &PropertyMap,
    ) {
        let key = (kind, path.to_string());
        self.pending_fetches.remove(&key);

        if !self.contains(kind, path) {
            if self.stale_fetches.remove(&key) {
                tracing::debug!("{}", Anomaly::StaleFetch { kind, path: key.1 });
            } else {
                tracing::warn!("{}", Anomaly::UnknownPath { kind, path: key.1 });
            }
            return;
        }

        tracing::debug!("Property set for {} {} ({} keys)", kind, path, properties.len());
        let changes =
            self.apply_properties(kind, path, properties.iter().map(|(k, v)| (k.as_str(), v)));
        self.finish_property_update(kind, path, changes);
    }

    /// Apply an incremental change of one property on an observed entity
    pub fn apply_single_property_update(
        &mut self,
        kind: ManagedType,
        path: &str,
        key: &str,
        value: &PropertyValue,
    ) {
        if !self.contains(kind, path) {
            tracing::warn!(
                "{}",
                Anomaly::UnknownPath {
                    kind,
                    path: path.to_string()
                }
            );
            return;
        }

        let changes = self.apply_properties(kind, path, std::iter::once((key, value)));
        self.finish_property_update(kind, path, changes);
    }

    /// Store a resolved IP address on a network service
    ///
    /// Bypasses the differ and always notifies.
    pub fn apply_ip_address_update(&mut self, service_path: &str, address: &str) {
        let Some(network) = self.networks.lookup_mut(service_path) else {
            tracing::debug!(
                "{}",
                Anomaly::StaleFetch {
                    kind: ManagedType::Network,
                    path: service_path.to_string()
                }
            );
            return;
        };
        network.set_ip_address(address);

        self.notify(vec![NetworkEvent::NetworkServiceChanged {
            path: service_path.to_string(),
        }]);
    }

    /// Replace a technology set wholesale
    pub fn apply_manager_property_update(&mut self, property: ManagerProperty, values: &[String]) {
        let mut technologies = HashSet::with_capacity(values.len());
        for value in values {
            if value.is_empty() {
                tracing::warn!("{}", Anomaly::EmptyTechnology);
                continue;
            }
            technologies.insert(value.clone());
        }

        tracing::debug!("Manager update {:?}: {:?}", property, technologies);
        match property {
            ManagerProperty::AvailableTechnologies => self.available_technologies = technologies,
            ManagerProperty::EnabledTechnologies => self.enabled_technologies = technologies,
        }

        self.notify(vec![NetworkEvent::ManagerChanged]);
    }

    /// The transport started delivering live changes for `path`
    pub fn apply_observation_started(&mut self, kind: ManagedType, path: &str) {
        let newly_observed = match self.managed_mut(kind, path) {
            Some(state) if !state.is_observed() => {
                state.set_observed(true);
                true
            }
            Some(_) => false,
            None => {
                tracing::warn!(
                    "{}",
                    Anomaly::UnknownPath {
                        kind,
                        path: path.to_string()
                    }
                );
                return;
            }
        };

        if newly_observed {
            self.request_properties(kind, path);
        }
    }

    /// Whether a property fetch for `path` is outstanding
    pub fn fetch_pending(&self, kind: ManagedType, path: &str) -> bool {
        self.pending_fetches.contains(&(kind, path.to_string()))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn paths(&self, kind: ManagedType) -> Vec<String> {
        match kind {
            ManagedType::Device => self.devices.paths(),
            ManagedType::Network => self.networks.paths(),
        }
    }

    fn contains(&self, kind: ManagedType, path: &str) -> bool {
        match kind {
            ManagedType::Device => self.devices.contains(path),
            ManagedType::Network => self.networks.contains(path),
        }
    }

    fn managed_mut(&mut self, kind: ManagedType, path: &str) -> Option<&mut ManagedState> {
        match kind {
            ManagedType::Device => self.devices.lookup_mut(path).map(DeviceState::managed_mut),
            ManagedType::Network => self.networks.lookup_mut(path).map(NetworkState::managed_mut),
        }
    }

    /// Issue a property fetch unless one is already outstanding
    fn request_properties(&mut self, kind: ManagedType, path: &str) {
        if self.pending_fetches.insert((kind, path.to_string())) {
            tracing::debug!("Requesting properties for {} {}", kind, path);
            self.transport.request_properties(kind, path);
        } else {
            tracing::trace!("Fetch already pending for {} {}", kind, path);
        }
    }

    fn apply_properties<'a, I>(
        &mut self,
        kind: ManagedType,
        path: &str,
        properties: I,
    ) -> PropertyChanges
    where
        I: IntoIterator<Item = (&'a str, &'a PropertyValue)>,
    {
        let mut changes = PropertyChanges::default();
        let mut ip_configs = Vec::new();

        let Some(state) = self.managed_mut(kind, path) else {
            return changes;
        };
        for (key, value) in properties {
            match PropertyDiffer::apply(state, key, value) {
                DiffOutcome::Changed => {
                    changes.changed = true;
                    if key == keys::STATE {
                        changes.state_changed = true;
                    }
                }
                DiffOutcome::Unchanged => {}
                DiffOutcome::FetchIpConfig(ip_config_path) => ip_configs.push(ip_config_path),
                DiffOutcome::Skipped(anomaly) => {
                    tracing::warn!("{} {}: {}", kind, path, anomaly);
                }
            }
        }

        for ip_config_path in ip_configs {
            tracing::debug!("Requesting IP config {} for {}", ip_config_path, path);
            self.transport.request_ip_config(path, &ip_config_path);
        }

        changes
    }

    fn finish_property_update(&mut self, kind: ManagedType, path: &str, changes: PropertyChanges) {
        if kind != ManagedType::Network || !changes.changed {
            return;
        }

        let mut events = vec![NetworkEvent::NetworkServiceChanged {
            path: path.to_string(),
        }];
        if changes.state_changed && self.active_network_path.as_deref() == Some(path) {
            let state = self
                .network(path)
                .map(NetworkState::connection_state)
                .unwrap_or_default();
            events.push(NetworkEvent::ActiveNetworkStateChanged {
                path: path.to_string(),
                state,
            });
        }

        self.notify(events);
    }

    fn check_network_ordering(&mut self) {
        let bucket = |n: &NetworkState| n.connection_state().priority_bucket();
        let ordered = self.networks.is_ordered_by_key(bucket);
        debug_assert!(ordered, "{}", Anomaly::InvalidatedOrdering);
        if !ordered {
            tracing::warn!("{}, re-sorting", Anomaly::InvalidatedOrdering);
            self.networks.reorder_by_key(bucket);
        }
    }

    fn notify(&self, events: Vec<NetworkEvent>) {
        for event in &events {
            tracing::trace!("Notify: {:?}", event);
            self.observers.dispatch(self, event);
        }
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("device_count", &self.devices.len())
            .field("network_count", &self.networks.len())
            .field("active_network_path", &self.active_network_path)
            .field("observers", &self.observers)
            .finish()
    }
}

/// Insert a colon between every pair of characters
///
/// Addresses with an odd number of characters are returned unchanged.
///
/// ```rust
/// use netsync_state::format_hardware_address;
///
/// assert_eq!(format_hardware_address("AABBCCDDEEFF"), "AA:BB:CC:DD:EE:FF");
/// assert_eq!(format_hardware_address("ABC"), "ABC");
/// ```
pub fn format_hardware_address(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() % 2 != 0 {
        return raw.to_string();
    }
    chars
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}
