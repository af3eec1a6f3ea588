//! Fabric records

use serde::{Deserialize, Serialize};

/// Pre-existing fabric entry under which zones are organized.
///
/// Only existence is consulted by the zone lifecycle; the record is seeded
/// at bootstrap and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FabricRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FabricRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}
