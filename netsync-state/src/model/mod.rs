//! Model types for netsync-state

mod connection_state;
mod device;
pub mod keys;
mod managed_state;
mod managed_type;
mod network;

pub use connection_state::ConnectionState;
pub use device::DeviceState;
pub use managed_state::ManagedState;
pub use managed_type::ManagedType;
pub use network::NetworkState;
