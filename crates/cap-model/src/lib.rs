//! Shared resource model for the ACI fabric plugin
//!
//! Redfish-flavoured zone resources exchanged on the northbound API and the
//! wire-level error envelope.

pub mod fabric;
pub mod response;
pub mod zone;

pub use fabric::FabricRecord;
pub use response::{ErrorBody, ErrorResponse, MessageId};
pub use zone::{
    CreateZoneRequest, Health, Link, RequestLinks, State, Status, Zone, ZoneCollection, ZoneLinks,
    ZoneType,
};
