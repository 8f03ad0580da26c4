//! Error types for netsync-state
//!
//! Update entry points never fail: malformed or stale input is an
//! `Anomaly`, logged and dropped. `StateError` covers the surrounding
//! plumbing (configuration, control loop, payload decoding).

use entity_table::ValueKind;
use thiserror::Error;

use crate::model::ManagedType;

/// Result type for netsync-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur around the state store
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Control loop has stopped")]
    WorkerStopped,

    #[error("Control loop thread panicked")]
    WorkerPanicked,

    #[error("Failed to spawn control loop: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("Failed to decode update: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Irregular input observed while applying an update
///
/// Never returned to callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Anomaly {
    #[error("{kind} update for unknown path {path}")]
    UnknownPath { kind: ManagedType, path: String },

    #[error("dropping stale fetch result for removed {kind} {path}")]
    StaleFetch { kind: ManagedType, path: String },

    #[error("property {key} expected {expected}, got {found}")]
    UnexpectedType {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("property {key} is null, skipped")]
    NullValue { key: String },

    #[error("{kind} list contained {count} empty path(s)")]
    EmptyPath { kind: ManagedType, count: usize },

    #[error("{kind} list repeated path {path}")]
    DuplicatePath { kind: ManagedType, path: String },

    #[error("empty IP configuration reference on {path}")]
    EmptyIpConfig { path: String },

    #[error("empty technology name in manager update")]
    EmptyTechnology,

    #[error("network list violates connected-first ordering")]
    InvalidatedOrdering,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_display() {
        let anomaly = Anomaly::UnknownPath {
            kind: ManagedType::Network,
            path: "/service/9".into(),
        };
        assert_eq!(anomaly.to_string(), "network update for unknown path /service/9");

        let anomaly = Anomaly::UnexpectedType {
            key: "Strength".into(),
            expected: ValueKind::Number,
            found: ValueKind::String,
        };
        assert_eq!(anomaly.to_string(), "property Strength expected number, got string");
    }

    #[test]
    fn test_decode_error_conversion() {
        let err: StateError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(matches!(err, StateError::Decode(_)));
    }
}
