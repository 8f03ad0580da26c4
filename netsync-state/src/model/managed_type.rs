//! Kind of a managed entity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which table an entity belongs to
///
/// Fixed at creation. `Network` is a network service (a connectable
/// network as seen by the network-management service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagedType {
    Device,
    Network,
}

impl fmt::Display for ManagedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagedType::Device => f.write_str("device"),
            ManagedType::Network => f.write_str("network"),
        }
    }
}
