//! Network State Handling
//!
//! An in-memory, observable model of network devices and network services
//! mirrored from a network-management service.
//!
//! # Features
//!
//! - **Authoritative Lists**: device and service lists are reconciled
//!   against the service's ordered path lists, preserving entity identity
//! - **Priority Ordering**: networks are kept connected first, then
//!   connecting, then the rest
//! - **Change Detection**: property updates only notify when a value
//!   actually changed
//! - **Observers**: synchronous callbacks with read access to the whole
//!   store, or a channel-backed iterator for other threads
//!
//! # Architecture
//!
//! ```text
//! Transport → UpdateEvent → ControlLoop → StateStore → Observers
//!     ↑                                       │
//!     └──── property / IP config fetches ─────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use netsync_state::{
//!     channel, HandlerConfig, ManagedType, NetworkEvent, RecordingTransport, StateStore,
//! };
//!
//! let transport = RecordingTransport::new();
//! let mut store = StateStore::new(transport.clone(), HandlerConfig::default()).unwrap();
//!
//! let (observer, changes) = channel();
//! store.add_observer(Arc::new(observer));
//!
//! store.apply_managed_list_update(ManagedType::Network, &["/service/1".to_string()]);
//!
//! assert_eq!(transport.property_requests(), vec!["/service/1".to_string()]);
//! assert_eq!(
//!     changes.try_recv(),
//!     Some(NetworkEvent::NetworkListChanged { paths: vec!["/service/1".to_string()] })
//! );
//! ```
//!
//! # Threaded Usage
//!
//! ```rust,ignore
//! let control = ControlLoop::spawn(store, &config)?;
//! let sender = control.sender();
//!
//! // From the transport's thread
//! sender.send(UpdateEvent::ManagedList { kind: ManagedType::Device, paths })?;
//!
//! let store = control.shutdown()?;
//! ```

// Core modules
pub mod differ;
pub mod event;
pub mod model;
pub mod store;

// Observer fan-out and channel bridge
pub mod iter;
pub mod observer;

// Transport seam and control thread
pub mod transport;
pub mod worker;

// Configuration
pub mod config;

// Error types
pub mod error;

// Logging infrastructure
pub mod logging;

// ============================================================================
// Re-exports
// ============================================================================

// Store
pub use store::{format_hardware_address, StateStore};

// Model
pub use model::{ConnectionState, DeviceState, ManagedState, ManagedType, NetworkState};

// Updates and notifications
pub use differ::{DiffOutcome, PropertyDiffer};
pub use event::{ManagerProperty, NetworkEvent, PropertyMap, UpdateEvent};
pub use iter::{channel, ChangeIterator, ChannelObserver};
pub use observer::{NetworkStateObserver, ObserverId, ObserverList};

// Transport and control loop
pub use transport::{PropertyTransport, RecordingTransport, TransportRequest};
pub use worker::{ControlLoop, UpdateSender};

// Config and errors
pub use config::HandlerConfig;
pub use error::{Anomaly, Result, StateError};

// Logging
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};

// Property storage from entity-table
pub use entity_table::{EntityHandle, PropertyBag, PropertyValue, ValueKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        channel, ConnectionState, ControlLoop, HandlerConfig, ManagedType, NetworkEvent,
        NetworkState, NetworkStateObserver, PropertyTransport, PropertyValue, StateStore,
        UpdateEvent,
    };
}
