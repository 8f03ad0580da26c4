//! Generic Entity Table Library
//!
//! Ordered, exclusively-owning collections of entities keyed by a stable
//! path, with change-detecting property storage.
//!
//! # Features
//!
//! - **Dynamic Properties**: `PropertyValue` models loosely-typed external
//!   payloads as a closed set of variants
//! - **Change Detection**: `PropertyBag::set` reports whether a value
//!   actually changed (content comparison)
//! - **Identity Preservation**: `EntityTable::reconcile` rebuilds order from
//!   an authoritative path list while reusing surviving entries
//! - **Stable Reordering**: `EntityTable::reorder_by_key` keeps prior
//!   relative order as the tie-break
//!
//! # Quick Start
//!
//! ```rust
//! use entity_table::{Entity, EntityHandle, EntityTable, PropertyBag, PropertyValue};
//!
//! struct Sensor {
//!     path: String,
//!     handle: EntityHandle,
//!     props: PropertyBag,
//! }
//!
//! impl Entity for Sensor {
//!     fn create(path: &str, handle: EntityHandle) -> Self {
//!         Self { path: path.to_string(), handle, props: PropertyBag::new() }
//!     }
//!     fn path(&self) -> &str {
//!         &self.path
//!     }
//!     fn handle(&self) -> EntityHandle {
//!         self.handle
//!     }
//! }
//!
//! let mut table = EntityTable::<Sensor>::new();
//! table.reconcile(&["/sensor/1".to_string(), "/sensor/2".to_string()]);
//!
//! let sensor = table.lookup_mut("/sensor/1").unwrap();
//! assert!(sensor.props.set("Temperature", PropertyValue::Number(21.5)));
//! assert!(!sensor.props.set("Temperature", PropertyValue::Number(21.5)));
//! ```
//!
//! # Architecture
//!
//! ```text
//! EntityTable<E>
//!     │
//!     ├── entries: Vec<E>            (semantic order)
//!     │       │
//!     │       └── E: Entity          (path + handle, owns its PropertyBag)
//!     │
//!     └── next_handle: u64           (identity allocator)
//! ```

// Modules
pub mod bag;
pub mod table;
pub mod value;

// Re-exports - Public API
pub use bag::PropertyBag;
pub use table::{Entity, EntityHandle, EntityTable, Reconciled, ReconcileReport};
pub use value::{PropertyValue, ValueKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bag::PropertyBag;
    pub use crate::table::{Entity, EntityHandle, EntityTable, ReconcileReport};
    pub use crate::value::{PropertyValue, ValueKind};
}
