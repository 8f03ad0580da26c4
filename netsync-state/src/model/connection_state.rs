//! Connection state of a network service

use serde::{Deserialize, Serialize};

/// Connection state reported by the network-management service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Idle,
    Association,
    Configuration,
    Ready,
    Online,
    /// Connected behind a captive portal
    Portal,
    Failure,
    ActivationFailure,
    Disconnect,
    /// Anything the service reports that is not listed above
    Unknown,
}

impl ConnectionState {
    /// Parse from the service's state string
    ///
    /// Matching is case-insensitive; unrecognised values map to `Unknown`.
    pub fn from_service_state(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "idle" => ConnectionState::Idle,
            "association" => ConnectionState::Association,
            "configuration" => ConnectionState::Configuration,
            "ready" => ConnectionState::Ready,
            "online" => ConnectionState::Online,
            "portal" => ConnectionState::Portal,
            "failure" => ConnectionState::Failure,
            "activation-failure" => ConnectionState::ActivationFailure,
            "disconnect" => ConnectionState::Disconnect,
            _ => ConnectionState::Unknown,
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(
            self,
            ConnectionState::Ready | ConnectionState::Online | ConnectionState::Portal
        )
    }

    pub fn is_connecting(self) -> bool {
        matches!(
            self,
            ConnectionState::Association | ConnectionState::Configuration
        )
    }

    /// Sort bucket for service lists: connected, then connecting, then the rest
    pub fn priority_bucket(self) -> u8 {
        if self.is_connected() {
            0
        } else if self.is_connecting() {
            1
        } else {
            2
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        ConnectionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_service_state_connected() {
        assert_eq!(
            ConnectionState::from_service_state("online"),
            ConnectionState::Online
        );
        assert_eq!(
            ConnectionState::from_service_state("Ready"),
            ConnectionState::Ready
        );
        assert!(ConnectionState::from_service_state("portal").is_connected());
    }

    #[test]
    fn test_from_service_state_connecting() {
        assert!(ConnectionState::from_service_state("association").is_connecting());
        assert!(ConnectionState::from_service_state("configuration").is_connecting());
        assert!(!ConnectionState::Association.is_connected());
    }

    #[test]
    fn test_from_service_state_unknown() {
        assert_eq!(
            ConnectionState::from_service_state("carrier"),
            ConnectionState::Unknown
        );
    }

    #[test]
    fn test_priority_bucket() {
        assert_eq!(ConnectionState::Online.priority_bucket(), 0);
        assert_eq!(ConnectionState::Configuration.priority_bucket(), 1);
        assert_eq!(ConnectionState::Idle.priority_bucket(), 2);
        assert_eq!(ConnectionState::Failure.priority_bucket(), 2);
    }

    #[test]
    fn test_default() {
        assert_eq!(ConnectionState::default(), ConnectionState::Idle);
    }
}
