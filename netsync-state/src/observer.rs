//! Observer registration and synchronous fan-out
//!
//! Observers are called on the control thread after an update has been
//! fully applied, so every callback sees the complete new model through
//! the `&StateStore` it is handed. Observers must not feed updates back
//! into the store from inside a callback.

use std::fmt;
use std::sync::Arc;

use crate::event::NetworkEvent;
use crate::model::NetworkState;
use crate::store::StateStore;

/// Receives change notifications from a `StateStore`
///
/// Every method has an empty default, implement only what you need.
pub trait NetworkStateObserver: Send + Sync {
    /// Technology availability or enablement was replaced
    fn network_manager_changed(&self, _store: &StateStore) {}

    fn device_list_changed(&self, _store: &StateStore) {}

    /// The ordered network list changed; `networks` is the new order
    fn network_list_changed(&self, _store: &StateStore, _networks: &[&NetworkState]) {}

    /// The active network switched (`None` when nothing is connected)
    fn active_network_changed(&self, _store: &StateStore, _network: Option<&NetworkState>) {}

    /// The connection state of the active network changed
    fn active_network_state_changed(&self, _store: &StateStore, _network: &NetworkState) {}

    /// A visible property of a network service changed
    fn network_service_changed(&self, _store: &StateStore, _network: &NetworkState) {}
}

/// Handle returned by `ObserverList::add`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered list of registered observers
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<(ObserverId, Arc<dyn NetworkStateObserver>)>,
    next_id: u64,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it is notified after those added before it
    pub fn add(&mut self, observer: Arc<dyn NetworkStateObserver>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push((id, observer));
        id
    }

    /// Unregister an observer, returning whether it was registered
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Deliver one event to every observer, in registration order
    pub(crate) fn dispatch(&self, store: &StateStore, event: &NetworkEvent) {
        if self.observers.is_empty() {
            return;
        }

        match event {
            NetworkEvent::ManagerChanged => {
                self.each(|o| o.network_manager_changed(store));
            }
            NetworkEvent::DeviceListChanged => {
                self.each(|o| o.device_list_changed(store));
            }
            NetworkEvent::NetworkListChanged { .. } => {
                let networks: Vec<&NetworkState> = store.networks().collect();
                self.each(|o| o.network_list_changed(store, &networks));
            }
            NetworkEvent::ActiveNetworkChanged { path } => {
                let network = path.as_deref().and_then(|p| store.network(p));
                self.each(|o| o.active_network_changed(store, network));
            }
            NetworkEvent::ActiveNetworkStateChanged { path, .. } => {
                if let Some(network) = store.network(path) {
                    self.each(|o| o.active_network_state_changed(store, network));
                }
            }
            NetworkEvent::NetworkServiceChanged { path } => {
                if let Some(network) = store.network(path) {
                    self.each(|o| o.network_service_changed(store, network));
                }
            }
        }
    }

    fn each<F>(&self, mut f: F)
    where
        F: FnMut(&dyn NetworkStateObserver),
    {
        for (_, observer) in &self.observers {
            f(observer.as_ref());
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observer_count", &self.observers.len())
            .finish()
    }
}
