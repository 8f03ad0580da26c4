//! Property-based tests for network ordering across update cycles

use std::sync::Arc;

use proptest::prelude::*;

use netsync_state::model::keys;
use netsync_state::{
    channel, ConnectionState, HandlerConfig, ManagedType, PropertyValue, RecordingTransport,
    StateStore,
};

const STATES: &[&str] = &[
    "idle",
    "association",
    "configuration",
    "ready",
    "online",
    "portal",
    "failure",
    "disconnect",
];

/// One cycle: state changes for some services, then a new list
#[derive(Debug, Clone)]
struct Cycle {
    states: Vec<(u8, usize)>,
    list: Vec<u8>,
}

fn service_path(id: u8) -> String {
    format!("/service/{}", id)
}

fn cycle_strategy() -> impl Strategy<Value = Cycle> {
    (
        prop::collection::vec((0u8..8, 0..STATES.len()), 0..6),
        prop::collection::vec(0u8..8, 0..8),
    )
        .prop_map(|(states, list)| Cycle { states, list })
}

fn bucket(state: ConnectionState) -> u8 {
    if state.is_connected() {
        0
    } else if state.is_connecting() {
        1
    } else {
        2
    }
}

fn apply_cycle(store: &mut StateStore, cycle: &Cycle) -> Vec<String> {
    for (id, state) in &cycle.states {
        store.apply_single_property_update(
            ManagedType::Network,
            &service_path(*id),
            keys::STATE,
            &PropertyValue::from(STATES[*state]),
        );
    }
    let list: Vec<String> = cycle.list.iter().map(|id| service_path(*id)).collect();
    store.apply_managed_list_update(ManagedType::Network, &list);
    list
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Connected services precede connecting ones, which precede the rest
    #[test]
    fn prop_network_order_by_bucket(cycles in prop::collection::vec(cycle_strategy(), 1..8)) {
        let mut store = StateStore::new(RecordingTransport::new(), HandlerConfig::default()).unwrap();

        for cycle in &cycles {
            apply_cycle(&mut store, cycle);

            let buckets: Vec<u8> = store.networks().map(|n| bucket(n.connection_state())).collect();
            prop_assert!(
                buckets.windows(2).all(|pair| pair[0] <= pair[1]),
                "unordered buckets {:?}",
                buckets
            );

            let active = store.networks().next().filter(|n| n.is_connected_state());
            prop_assert_eq!(
                store.active_network_path(),
                active.map(|n| n.path())
            );
        }
    }

    /// Re-applying the last list produces no notifications
    #[test]
    fn prop_repeated_list_is_silent(cycles in prop::collection::vec(cycle_strategy(), 1..6)) {
        let mut store = StateStore::new(RecordingTransport::new(), HandlerConfig::default()).unwrap();
        let (observer, changes) = channel();
        store.add_observer(Arc::new(observer));

        let mut last = Vec::new();
        for cycle in &cycles {
            last = apply_cycle(&mut store, cycle);
        }
        let _ = changes.try_iter().count();

        store.apply_managed_list_update(ManagedType::Network, &last);
        prop_assert_eq!(changes.try_iter().count(), 0);
    }

    /// Services that stay listed keep their handle
    #[test]
    fn prop_handles_survive_reconcile(first in cycle_strategy(), second in cycle_strategy()) {
        let mut store = StateStore::new(RecordingTransport::new(), HandlerConfig::default()).unwrap();
        apply_cycle(&mut store, &first);
        let before: Vec<_> = store
            .networks()
            .map(|n| (n.path().to_string(), n.managed().handle()))
            .collect();

        apply_cycle(&mut store, &second);
        for (path, handle) in before {
            if let Some(network) = store.network(&path) {
                prop_assert_eq!(network.managed().handle(), handle);
            }
        }
    }
}
