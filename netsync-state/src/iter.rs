//! Channel-backed observer with blocking iteration
//!
//! Bridges observer callbacks to a `std::sync::mpsc` channel so consumers
//! on any thread can pull `NetworkEvent`s:
//! - Blocking: `recv()`, `for event in iter`
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`, `timeout_iter()`

use std::sync::mpsc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::event::NetworkEvent;
use crate::model::NetworkState;
use crate::observer::NetworkStateObserver;
use crate::store::StateStore;

/// Create a connected observer / iterator pair
///
/// ```rust,ignore
/// let (observer, changes) = netsync_state::channel();
/// store.add_observer(Arc::new(observer));
///
/// for event in changes.try_iter() {
///     println!("{:?}", event);
/// }
/// ```
pub fn channel() -> (ChannelObserver, ChangeIterator) {
    let (tx, rx) = mpsc::channel();
    (
        ChannelObserver { tx: Mutex::new(tx) },
        ChangeIterator { rx },
    )
}

/// Observer that forwards every notification as a `NetworkEvent`
pub struct ChannelObserver {
    tx: Mutex<mpsc::Sender<NetworkEvent>>,
}

impl ChannelObserver {
    fn send(&self, event: NetworkEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.lock().send(event);
    }
}

impl NetworkStateObserver for ChannelObserver {
    fn network_manager_changed(&self, _store: &StateStore) {
        self.send(NetworkEvent::ManagerChanged);
    }

    fn device_list_changed(&self, _store: &StateStore) {
        self.send(NetworkEvent::DeviceListChanged);
    }

    fn network_list_changed(&self, _store: &StateStore, networks: &[&NetworkState]) {
        let paths = networks.iter().map(|n| n.path().to_string()).collect();
        self.send(NetworkEvent::NetworkListChanged { paths });
    }

    fn active_network_changed(&self, _store: &StateStore, network: Option<&NetworkState>) {
        self.send(NetworkEvent::ActiveNetworkChanged {
            path: network.map(|n| n.path().to_string()),
        });
    }

    fn active_network_state_changed(&self, _store: &StateStore, network: &NetworkState) {
        self.send(NetworkEvent::ActiveNetworkStateChanged {
            path: network.path().to_string(),
            state: network.connection_state(),
        });
    }

    fn network_service_changed(&self, _store: &StateStore, network: &NetworkState) {
        self.send(NetworkEvent::NetworkServiceChanged {
            path: network.path().to_string(),
        });
    }
}

/// Blocking iterator over network events
pub struct ChangeIterator {
    rx: mpsc::Receiver<NetworkEvent>,
}

impl ChangeIterator {
    /// Block until the next event is available
    ///
    /// Returns `None` once every sender is gone.
    pub fn recv(&self) -> Option<NetworkEvent> {
        self.rx.recv().ok()
    }

    /// Returns `None` if the timeout expires or the channel is closed
    pub fn recv_timeout(&self, timeout: Duration) -> Option<NetworkEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<NetworkEvent> {
        self.rx.try_recv().ok()
    }

    /// Iterator over events already queued, without blocking
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { inner: self }
    }

    /// Iterator that waits up to `timeout` for each event
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for ChangeIterator {
    type Item = NetworkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Non-blocking iterator over currently available events
pub struct TryIter<'a> {
    inner: &'a ChangeIterator,
}

impl Iterator for TryIter<'_> {
    type Item = NetworkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a> {
    inner: &'a ChangeIterator,
    timeout: Duration,
}

impl Iterator for TimeoutIter<'_> {
    type Item = NetworkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
