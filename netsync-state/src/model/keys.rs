//! Property names used by the network-management service
//!
//! Only keys the handler interprets are listed. Any other key is stored
//! verbatim with no type expectation.

use entity_table::ValueKind;

pub const STATE: &str = "State";
pub const TYPE: &str = "Type";
pub const NAME: &str = "Name";
pub const DEVICE: &str = "Device";
pub const IP_CONFIG: &str = "IPConfig";
pub const ADDRESS: &str = "Address";
pub const STRENGTH: &str = "Strength";
pub const SECURITY: &str = "Security";
pub const ERROR: &str = "Error";
pub const POWERED: &str = "Powered";
pub const SCANNING: &str = "Scanning";
pub const CONNECTABLE: &str = "Connectable";

pub const TYPE_ETHERNET: &str = "ethernet";

/// Expected value type for a known key, `None` if any type is accepted
pub fn expected_kind(key: &str) -> Option<ValueKind> {
    match key {
        STATE | TYPE | NAME | DEVICE | IP_CONFIG | ADDRESS | SECURITY | ERROR => {
            Some(ValueKind::String)
        }
        STRENGTH => Some(ValueKind::Number),
        POWERED | SCANNING | CONNECTABLE => Some(ValueKind::Bool),
        _ => None,
    }
}
