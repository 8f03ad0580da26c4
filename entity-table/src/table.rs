//! Ordered, exclusively-owning entity storage
//!
//! An `EntityTable` owns every entity it contains. Callers borrow entries
//! for the duration of a query and never keep them across an update
//! cycle; the path is the only durable reference.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identity of an entity within its table
///
/// Assigned once at creation and never reused by the same table. When a
/// path survives `reconcile`, the entity keeps its handle, so comparing
/// handles tells whether a record was reused or recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(u64);

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contract for values stored in an `EntityTable`
pub trait Entity {
    /// Construct a fresh entity for a newly seen path
    fn create(path: &str, handle: EntityHandle) -> Self;

    /// Stable identifier assigned by the external service
    fn path(&self) -> &str;

    fn handle(&self) -> EntityHandle;
}

/// Outcome for one path kept by `reconcile`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub path: String,
    /// `true` if the entity did not exist before this cycle
    pub created: bool,
}

/// Everything `reconcile` did, in incoming order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Kept paths in their new order
    pub entries: Vec<Reconciled>,
    /// Paths that were dropped, in their prior order
    pub removed: Vec<String>,
    /// Paths that appeared more than once; only the first occurrence counts
    pub duplicates: Vec<String>,
    /// Number of empty paths ignored
    pub skipped_empty: usize,
    /// Whether the ordered path sequence differs from before
    pub order_changed: bool,
}

impl ReconcileReport {
    /// Paths created during this cycle
    pub fn created(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.created)
            .map(|e| e.path.as_str())
    }
}

/// Ordered collection of entities of one kind, keyed by path
///
/// Order is semantic: it is whatever the last `reconcile` (and optional
/// `reorder_by_key`) produced. Lookups are linear, matching the small
/// sizes of real device and service lists.
#[derive(Debug)]
pub struct EntityTable<E> {
    entries: Vec<E>,
    next_handle: u64,
}

impl<E: Entity> EntityTable<E> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 1,
        }
    }

    fn allocate_handle(&mut self) -> EntityHandle {
        let handle = EntityHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.path() == path)
    }

    /// Return the entity for `path`, creating and appending it if needed
    ///
    /// Never replaces an existing entity.
    pub fn upsert(&mut self, path: &str) -> &mut E {
        let idx = match self.position(path) {
            Some(idx) => idx,
            None => {
                let handle = self.allocate_handle();
                self.entries.push(E::create(path, handle));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    /// Rebuild the table from an authoritative ordered path list
    ///
    /// Entities whose path is still listed are moved, not recreated, into
    /// their new position. Entities not listed are dropped. Empty and
    /// repeated paths are ignored and reported.
    pub fn reconcile(&mut self, paths: &[String]) -> ReconcileReport {
        let before = self.paths();
        let mut existing: HashMap<String, E> = self
            .entries
            .drain(..)
            .map(|e| (e.path().to_string(), e))
            .collect();

        let mut report = ReconcileReport::default();
        let mut seen = HashSet::with_capacity(paths.len());

        for path in paths {
            if path.is_empty() {
                report.skipped_empty += 1;
                continue;
            }
            if !seen.insert(path.as_str()) {
                report.duplicates.push(path.clone());
                continue;
            }

            let created = match existing.remove(path) {
                Some(entity) => {
                    self.entries.push(entity);
                    false
                }
                None => {
                    let handle = self.allocate_handle();
                    self.entries.push(E::create(path, handle));
                    true
                }
            };
            report.entries.push(Reconciled {
                path: path.clone(),
                created,
            });
        }

        for path in &before {
            if existing.remove(path).is_some() {
                report.removed.push(path.clone());
            }
        }

        report.order_changed = self.entries.len() != before.len()
            || self.entries.iter().zip(&before).any(|(e, p)| e.path() != p);
        report
    }

    /// Stable sort by `key`; prior relative order breaks ties
    ///
    /// Returns whether the order changed.
    pub fn reorder_by_key<K, F>(&mut self, key: F) -> bool
    where
        K: Ord,
        F: FnMut(&E) -> K,
    {
        let before: Vec<EntityHandle> = self.entries.iter().map(Entity::handle).collect();
        self.entries.sort_by_key(key);
        self.entries
            .iter()
            .zip(&before)
            .any(|(e, handle)| e.handle() != *handle)
    }

    /// Whether the current order is non-decreasing under `key`
    pub fn is_ordered_by_key<K, F>(&self, mut key: F) -> bool
    where
        K: Ord,
        F: FnMut(&E) -> K,
    {
        self.entries
            .windows(2)
            .all(|pair| key(&pair[0]) <= key(&pair[1]))
    }

    pub fn lookup(&self, path: &str) -> Option<&E> {
        self.entries.iter().find(|e| e.path() == path)
    }

    pub fn lookup_mut(&mut self, path: &str) -> Option<&mut E> {
        self.entries.iter_mut().find(|e| e.path() == path)
    }

    /// First entity in table order matching `predicate`
    pub fn find<P>(&self, mut predicate: P) -> Option<&E>
    where
        P: FnMut(&E) -> bool,
    {
        self.entries.iter().find(|e| predicate(e))
    }

    pub fn first(&self) -> Option<&E> {
        self.entries.first()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.position(path).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    /// Snapshot of all paths in table order
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entity; handles are not reused afterwards
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E: Entity> Default for EntityTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E: Entity> IntoIterator for &'a EntityTable<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
