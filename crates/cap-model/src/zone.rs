//! Zone resource model
//!
//! Serde representations of the zone resources exposed by the plugin and of
//! the zone creation request body.

use serde::{Deserialize, Serialize};

/// OData metadata stamped on persisted zone records.
pub const ZONE_ODATA_CONTEXT: &str = "/ODIM/v1/$metadata#Zone.Zone";
pub const ZONE_ODATA_TYPE: &str = "#Zone.v1_4_0.Zone";

/// OData metadata stamped on zone collection views.
pub const ZONE_COLLECTION_ODATA_CONTEXT: &str = "/ODIM/v1/$metadata#ZoneCollection.ZoneCollection";
pub const ZONE_COLLECTION_ODATA_TYPE: &str = "#ZoneCollection.ZoneCollection";

/// Fixed zone variants understood by the lifecycle manager.
///
/// Unrecognized wire values land on [`ZoneType::Unknown`] so that dispatch
/// can answer "not implemented" instead of failing deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ZoneType {
    Default,
    ZoneOfZones,
    ZoneOfEndpoints,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneType::Default => write!(f, "Default"),
            ZoneType::ZoneOfZones => write!(f, "ZoneOfZones"),
            ZoneType::ZoneOfEndpoints => write!(f, "ZoneOfEndpoints"),
            ZoneType::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum State {
    Enabled,
    Disabled,
    Absent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Health {
    OK,
    Warning,
    Critical,
}

/// Resource status pair; set to Enabled/OK on successful creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Status {
    #[serde(rename = "State")]
    pub state: State,
    #[serde(rename = "Health")]
    pub health: Health,
}

impl Status {
    pub fn enabled_ok() -> Self {
        Self {
            state: State::Enabled,
            health: Health::OK,
        }
    }
}

/// Reference to another resource by URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    #[serde(rename = "@odata.id")]
    pub oid: String,
}

impl Link {
    pub fn new(oid: impl Into<String>) -> Self {
        Self { oid: oid.into() }
    }
}

/// Containment references tracked on both ends of the hierarchy.
///
/// The `*_count` fields are recomputed whenever the matching sequence is
/// mutated; `contains_zones_count == contains_zones.len()` holds at all
/// times.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneLinks {
    #[serde(rename = "ContainedByZones", default, skip_serializing_if = "Vec::is_empty")]
    pub contained_by_zones: Vec<Link>,
    #[serde(rename = "ContainedByZones@odata.count", default)]
    pub contained_by_zones_count: usize,
    #[serde(rename = "ContainsZones", default, skip_serializing_if = "Vec::is_empty")]
    pub contains_zones: Vec<Link>,
    #[serde(rename = "ContainsZones@odata.count", default)]
    pub contains_zones_count: usize,
}

/// A logical zone mapped onto the fabric controller's native resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    #[serde(rename = "@odata.context", default, skip_serializing_if = "String::is_empty")]
    pub odata_context: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(rename = "@odata.type", default, skip_serializing_if = "String::is_empty")]
    pub odata_type: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "ZoneType")]
    pub zone_type: ZoneType,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(rename = "Links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ZoneLinks>,
}

impl Zone {
    /// The single parent reference, when the record carries exactly one.
    pub fn single_parent_uri(&self) -> Option<&str> {
        match self.links.as_ref()?.contained_by_zones.as_slice() {
            [only] => Some(&only.oid),
            _ => None,
        }
    }

    /// Number of child references currently attached.
    pub fn contains_zones_count(&self) -> usize {
        self.links
            .as_ref()
            .map(|links| links.contains_zones_count)
            .unwrap_or(0)
    }
}

/// Links section of a zone creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestLinks {
    #[serde(rename = "ContainedByZones", default)]
    pub contained_by_zones: Vec<Link>,
}

/// Body of a zone creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateZoneRequest {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "ZoneType")]
    pub zone_type: ZoneType,
    #[serde(rename = "Links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<RequestLinks>,
}

/// Collection view over the zones of one fabric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCollection {
    #[serde(rename = "@odata.context")]
    pub odata_context: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Members")]
    pub members: Vec<Link>,
    #[serde(rename = "Members@odata.count")]
    pub members_count: usize,
}

impl ZoneCollection {
    /// Collection view with stamped metadata for the given URI and members.
    pub fn new(uri: impl Into<String>, members: Vec<Link>) -> Self {
        Self {
            odata_context: ZONE_COLLECTION_ODATA_CONTEXT.to_string(),
            odata_id: uri.into(),
            odata_type: ZONE_COLLECTION_ODATA_TYPE.to_string(),
            name: "Zones".to_string(),
            description: "ZoneCollection view".to_string(),
            members_count: members.len(),
            members,
        }
    }
}
