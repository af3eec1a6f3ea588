//! In-memory zone directory
//!
//! Keyed by zone resource URI, with a read-only fabric existence table
//! seeded at bootstrap. State exists only for process lifetime.

use indexmap::IndexMap;

use cap_model::{FabricRecord, Zone};

/// A stored zone together with its owning fabric.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRecord {
    pub fabric_id: String,
    pub zone: Zone,
}

/// Directory of zone records plus the fabric lookup table.
///
/// The store performs no synchronization of its own; the lifecycle manager
/// serializes mutating access by holding a write lock across every
/// check/create/persist/link sequence.
#[derive(Debug, Default)]
pub struct ZoneStore {
    fabrics: IndexMap<String, FabricRecord>,
    zones: IndexMap<String, ZoneRecord>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fabric record. Fabric management itself is a collaborator
    /// concern; the core only ever consults existence.
    pub fn register_fabric(&mut self, record: FabricRecord) {
        self.fabrics.insert(record.id.clone(), record);
    }

    pub fn fabric_exists(&self, fabric_id: &str) -> bool {
        self.fabrics.contains_key(fabric_id)
    }

    pub fn put(&mut self, uri: impl Into<String>, record: ZoneRecord) {
        self.zones.insert(uri.into(), record);
    }

    pub fn get(&self, uri: &str) -> Option<&ZoneRecord> {
        self.zones.get(uri)
    }

    pub fn get_mut(&mut self, uri: &str) -> Option<&mut ZoneRecord> {
        self.zones.get_mut(uri)
    }

    pub fn remove(&mut self, uri: &str) -> Option<ZoneRecord> {
        self.zones.shift_remove(uri)
    }

    /// All records owned by the given fabric, in insertion order.
    pub fn list_by_fabric(&self, fabric_id: &str) -> Vec<&ZoneRecord> {
        self.zones
            .values()
            .filter(|record| record.fabric_id == fabric_id)
            .collect()
    }

    /// Whole-directory scan by zone name, regardless of type or fabric.
    pub fn find_by_name(&self, name: &str) -> Option<&ZoneRecord> {
        self.zones.values().find(|record| record.zone.name == name)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
