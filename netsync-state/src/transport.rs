//! Seam to the network-management service
//!
//! The store never talks to the service directly. Every request goes
//! through `PropertyTransport`, is fire-and-forget, and its result comes
//! back later as an `UpdateEvent` applied on the control thread.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::model::ManagedType;

/// Requests the store issues to the network-management service
pub trait PropertyTransport: Send {
    /// Ask for the ordered path list of one kind
    fn request_managed_list(&self, kind: ManagedType);

    /// Ask for the full property set of one entity
    fn request_properties(&self, kind: ManagedType, path: &str);

    /// Resolve an IP configuration object for a network service
    fn request_ip_config(&self, service_path: &str, ip_config_path: &str);

    fn set_technology_enabled(&self, technology: &str, enabled: bool);

    /// Best-effort refresh trigger
    fn request_scan(&self);

    /// Whether live property changes are being delivered for `path`
    fn is_observing(&self, path: &str) -> bool;
}

/// One request issued through a `RecordingTransport`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum TransportRequest {
    ManagedList {
        kind: ManagedType,
    },
    Properties {
        kind: ManagedType,
        path: String,
    },
    IpConfig {
        service_path: String,
        ip_config_path: String,
    },
    SetTechnologyEnabled {
        technology: String,
        enabled: bool,
    },
    Scan,
}

#[derive(Debug, Default)]
struct Recorded {
    requests: Vec<TransportRequest>,
    observing: HashSet<String>,
}

/// Transport that records every request instead of sending it
///
/// Clones share the same log, so a test can keep one clone while the
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `path` as observed from now on
    pub fn observe(&self, path: &str) {
        self.inner.lock().observing.insert(path.to_string());
    }

    pub fn unobserve(&self, path: &str) {
        self.inner.lock().observing.remove(path);
    }

    /// Snapshot of all requests so far
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.inner.lock().requests.clone()
    }

    /// Return and clear all requests so far
    pub fn take_requests(&self) -> Vec<TransportRequest> {
        std::mem::take(&mut self.inner.lock().requests)
    }

    /// Paths for which properties were requested, in request order
    pub fn property_requests(&self) -> Vec<String> {
        self.inner
            .lock()
            .requests
            .iter()
            .filter_map(|r| match r {
                TransportRequest::Properties { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: TransportRequest) {
        tracing::trace!("transport request: {:?}", request);
        self.inner.lock().requests.push(request);
    }
}

impl PropertyTransport for RecordingTransport {
    fn request_managed_list(&self, kind: ManagedType) {
        self.record(TransportRequest::ManagedList { kind });
    }

    fn request_properties(&self, kind: ManagedType, path: &str) {
        self.record(TransportRequest::Properties {
            kind,
            path: path.to_string(),
        });
    }

    fn request_ip_config(&self, service_path: &str, ip_config_path: &str) {
        self.record(TransportRequest::IpConfig {
            service_path: service_path.to_string(),
            ip_config_path: ip_config_path.to_string(),
        });
    }

    fn set_technology_enabled(&self, technology: &str, enabled: bool) {
        self.record(TransportRequest::SetTechnologyEnabled {
            technology: technology.to_string(),
            enabled,
        });
    }

    fn request_scan(&self) {
        self.record(TransportRequest::Scan);
    }

    fn is_observing(&self, path: &str) -> bool {
        self.inner.lock().observing.contains(path)
    }
}
