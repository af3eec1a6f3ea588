//! Containment link maintenance
//!
//! Adds and removes `ContainsZones` entries on parent zone records and keeps
//! the redundant counters equal to the sequence length.

use cap_model::{Link, ZoneLinks};

use crate::error::{ZoneError, ZoneResult};
use crate::store::ZoneStore;

/// Keeps the bidirectional containment links between zone records
/// consistent.
pub struct LinkMaintainer;

impl LinkMaintainer {
    /// Append `child_uri` to the parent's `ContainsZones` sequence and
    /// recompute the count. An absent link set on the parent is created
    /// empty first.
    pub fn attach(store: &mut ZoneStore, parent_uri: &str, child_uri: &str) -> ZoneResult<()> {
        let parent = store.get_mut(parent_uri).ok_or_else(|| ZoneError::NotFound {
            resource: "Zone",
            uri: parent_uri.to_string(),
        })?;

        let links = parent.zone.links.get_or_insert_with(ZoneLinks::default);
        links.contains_zones.push(Link::new(child_uri));
        links.contains_zones_count = links.contains_zones.len();
        Ok(())
    }

    /// Remove the exact `child_uri` reference from the parent's
    /// `ContainsZones` sequence and recompute the count.
    ///
    /// Fails when no matching reference exists; a missing link is never
    /// substituted with another element.
    pub fn detach(store: &mut ZoneStore, parent_uri: &str, child_uri: &str) -> ZoneResult<()> {
        let parent = store.get_mut(parent_uri).ok_or_else(|| ZoneError::NotFound {
            resource: "Zone",
            uri: parent_uri.to_string(),
        })?;

        let links = parent.zone.links.as_mut().ok_or_else(|| ZoneError::NotFound {
            resource: "ContainsZones link",
            uri: child_uri.to_string(),
        })?;

        let index = links
            .contains_zones
            .iter()
            .position(|link| link.oid == child_uri)
            .ok_or_else(|| ZoneError::NotFound {
                resource: "ContainsZones link",
                uri: child_uri.to_string(),
            })?;

        links.contains_zones.remove(index);
        links.contains_zones_count = links.contains_zones.len();
        Ok(())
    }
}
