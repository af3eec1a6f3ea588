//! Zone lifecycle orchestration
//!
//! Dispatches creation by zone type, sequences the pre-check, external
//! create, persist and link steps against the fabric controller, and
//! implements cascading-delete validation.
//!
//! Every mutating operation holds the directory write lock across the full
//! sequence, so concurrent creations or deletions against the same fabric
//! subtree are serialized. The pre-check-then-create pattern against the
//! external catalog is still not atomic across the two round trips; the
//! controller itself remains the final arbiter of uniqueness.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::RwLock;
use uuid::Uuid;

use cap_model::zone::{ZONE_ODATA_CONTEXT, ZONE_ODATA_TYPE};
use cap_model::{
    CreateZoneRequest, Link, Status, Zone, ZoneCollection, ZoneLinks, ZoneType,
};

use crate::controller::{AdapterError, FabricControllerAdapter};
use crate::error::{ZoneError, ZoneResult};
use crate::links::LinkMaintainer;
use crate::store::{ZoneRecord, ZoneStore};

/// Suffix appended to a zone name to derive its VRF name.
const VRF_SUFFIX: &str = "-VRF";

/// Outcome of a successful creation: the persisted (or associated) record
/// and the location reference to return to the caller.
#[derive(Debug, Clone)]
pub struct CreatedZone {
    pub zone: Zone,
    pub location: String,
}

/// Coordinates zone creation and deletion between the directory store and
/// the external fabric controller.
pub struct ZoneLifecycleManager {
    store: Arc<RwLock<ZoneStore>>,
    controller: Arc<dyn FabricControllerAdapter>,
}

impl ZoneLifecycleManager {
    pub fn new(store: Arc<RwLock<ZoneStore>>, controller: Arc<dyn FabricControllerAdapter>) -> Self {
        Self { store, controller }
    }

    /// Create a zone under the given fabric, dispatching on the requested
    /// zone type.
    pub async fn create_zone(
        &self,
        fabric_id: &str,
        collection_uri: &str,
        request: CreateZoneRequest,
    ) -> ZoneResult<CreatedZone> {
        let mut store = self.store.write().await;

        if !store.fabric_exists(fabric_id) {
            return Err(ZoneError::NotFound {
                resource: "Fabric",
                uri: fabric_id.to_string(),
            });
        }
        if request.name.trim().is_empty() {
            return Err(ZoneError::MalformedRequest {
                message: "zone name cannot be empty".to_string(),
            });
        }

        match request.zone_type {
            ZoneType::Default => {
                self.create_default_zone(&mut store, fabric_id, collection_uri, &request)
                    .await
            }
            ZoneType::ZoneOfZones => {
                self.create_zone_of_zones(&mut store, fabric_id, collection_uri, &request)
                    .await
            }
            ZoneType::ZoneOfEndpoints => {
                self.create_zone_of_endpoints(&mut store, fabric_id, collection_uri, &request)
                    .await
            }
            ZoneType::Unknown => Err(ZoneError::NotImplemented {
                zone_type: request.zone_type,
            }),
        }
    }

    /// Default zones map to tenants in the controller catalog.
    async fn create_default_zone(
        &self,
        store: &mut ZoneStore,
        fabric_id: &str,
        collection_uri: &str,
        request: &CreateZoneRequest,
    ) -> ZoneResult<CreatedZone> {
        let tenants = self.controller.list_tenants().await?;
        if tenants.iter().any(|tenant| tenant.name == request.name) {
            return Err(ZoneError::AlreadyExists {
                resource: "DefaultZone",
                name: request.name.clone(),
            });
        }

        self.controller
            .create_tenant(&request.name, request.description.as_deref().unwrap_or(""))
            .await?;
        info!("tenant {} provisioned for fabric {}", request.name, fabric_id);

        // A record with the same name anywhere in the directory means the
        // request is associated with the existing record instead of
        // persisting a duplicate.
        if let Some(existing) = store.find_by_name(&request.name) {
            let zone = existing.zone.clone();
            let location = zone.odata_id.clone();
            return Ok(CreatedZone { zone, location });
        }

        let zone = persist_zone(store, fabric_id, collection_uri, request);
        let location = zone.odata_id.clone();
        Ok(CreatedZone { zone, location })
    }

    /// Zones of zones map to an application profile plus a VRF under the
    /// parent Default zone's tenant.
    async fn create_zone_of_zones(
        &self,
        store: &mut ZoneStore,
        fabric_id: &str,
        collection_uri: &str,
        request: &CreateZoneRequest,
    ) -> ZoneResult<CreatedZone> {
        let parent_uri = single_contained_by(request)?;
        let parent = store
            .get(&parent_uri)
            .filter(|record| record.zone.zone_type == ZoneType::Default)
            .ok_or_else(|| ZoneError::NotFound {
                resource: "DefaultZone",
                uri: parent_uri.clone(),
            })?;
        let tenant = parent.zone.name.clone();
        let tenant_description = parent.zone.description.clone().unwrap_or_default();

        let vrf_name = format!("{}{}", request.name, VRF_SUFFIX);

        let profiles = benign_not_found(self.controller.list_application_profiles(&tenant).await)?;
        if profiles.iter().any(|profile| profile.name == request.name) {
            return Err(ZoneError::AlreadyExists {
                resource: "ApplicationProfile",
                name: request.name.clone(),
            });
        }

        let vrfs = benign_not_found(self.controller.list_vrfs(&tenant).await)?;
        if vrfs.iter().any(|vrf| vrf.name == vrf_name) {
            return Err(ZoneError::AlreadyExists {
                resource: "VRF",
                name: vrf_name,
            });
        }

        self.controller
            .create_application_profile(&request.name, &tenant, &tenant_description)
            .await?;
        if let Err(err) = self
            .controller
            .create_vrf(&vrf_name, &tenant, &tenant_description)
            .await
        {
            // The application profile is already committed on the
            // controller; it stays in place and the failure is surfaced.
            warn!(
                "VRF {} creation failed after application profile {} was provisioned under tenant {}: {}",
                vrf_name, request.name, tenant, err
            );
            return Err(err.into());
        }

        let zone = persist_zone(store, fabric_id, collection_uri, request);
        LinkMaintainer::attach(store, &parent_uri, &zone.odata_id)?;
        info!(
            "zone of zones {} attached under default zone {}",
            zone.odata_id, parent_uri
        );

        let location = zone.odata_id.clone();
        Ok(CreatedZone { zone, location })
    }

    /// Zones of endpoints map to a bridge domain under the tenant resolved
    /// through the parent zone-of-zones' own Default parent.
    async fn create_zone_of_endpoints(
        &self,
        store: &mut ZoneStore,
        fabric_id: &str,
        collection_uri: &str,
        request: &CreateZoneRequest,
    ) -> ZoneResult<CreatedZone> {
        let zone_of_zones_uri = single_contained_by(request)?;
        let zone_of_zones = store
            .get(&zone_of_zones_uri)
            .filter(|record| record.zone.zone_type == ZoneType::ZoneOfZones)
            .ok_or_else(|| ZoneError::NotFound {
                resource: "ZoneOfZones",
                uri: zone_of_zones_uri.clone(),
            })?;

        let default_uri = zone_of_zones
            .zone
            .single_parent_uri()
            .map(str::to_string)
            .ok_or_else(|| ZoneError::NotFound {
                resource: "DefaultZone",
                uri: zone_of_zones_uri.clone(),
            })?;
        let default_zone = store
            .get(&default_uri)
            .filter(|record| record.zone.zone_type == ZoneType::Default)
            .ok_or_else(|| ZoneError::NotFound {
                resource: "DefaultZone",
                uri: default_uri.clone(),
            })?;
        let tenant = default_zone.zone.name.clone();

        let bridge_domains = benign_not_found(self.controller.list_bridge_domains(&tenant).await)?;
        if bridge_domains.iter().any(|bd| bd.name == request.name) {
            return Err(ZoneError::AlreadyExists {
                resource: "ZoneOfEndpoints",
                name: request.name.clone(),
            });
        }

        self.controller
            .create_bridge_domain(
                &request.name,
                &tenant,
                request.description.as_deref().unwrap_or(""),
            )
            .await?;
        info!(
            "bridge domain {} provisioned under tenant {}",
            request.name, tenant
        );

        // Bridge-domain zones are persisted but not linked into the parent's
        // ContainsZones.
        let zone = persist_zone(store, fabric_id, collection_uri, request);
        let location = zone.odata_id.clone();
        Ok(CreatedZone { zone, location })
    }

    /// Delete the zone identified by `uri`, refusing while children remain
    /// attached.
    pub async fn delete_zone(&self, fabric_id: &str, uri: &str) -> ZoneResult<()> {
        let mut store = self.store.write().await;

        if !store.fabric_exists(fabric_id) {
            return Err(ZoneError::NotFound {
                resource: "Fabric",
                uri: fabric_id.to_string(),
            });
        }

        let (zone_type, zone_name, parent_uri, contains_count) = {
            let record = store.get(uri).ok_or_else(|| ZoneError::NotFound {
                resource: "Zone",
                uri: uri.to_string(),
            })?;
            (
                record.zone.zone_type,
                record.zone.name.clone(),
                record.zone.single_parent_uri().map(str::to_string),
                record.zone.contains_zones_count(),
            )
        };

        if contains_count != 0 {
            return Err(ZoneError::CannotDelete {
                uri: uri.to_string(),
            });
        }

        match zone_type {
            ZoneType::ZoneOfZones => {
                if let Some(parent_uri) = parent_uri {
                    LinkMaintainer::detach(&mut store, &parent_uri, uri)?;
                }
                store.remove(uri);
                info!("zone of zones {} removed", uri);
                Ok(())
            }
            ZoneType::Default => {
                self.controller.delete_tenant(&zone_name).await?;
                store.remove(uri);
                info!("default zone {} removed, tenant {} de-provisioned", uri, zone_name);
                Ok(())
            }
            ZoneType::ZoneOfEndpoints | ZoneType::Unknown => {
                Err(ZoneError::NotImplemented { zone_type })
            }
        }
    }

    /// Single-record lookup.
    pub async fn get_zone(&self, fabric_id: &str, uri: &str) -> ZoneResult<Zone> {
        let store = self.store.read().await;

        if !store.fabric_exists(fabric_id) {
            return Err(ZoneError::NotFound {
                resource: "Fabric",
                uri: fabric_id.to_string(),
            });
        }
        store
            .get(uri)
            .map(|record| record.zone.clone())
            .ok_or_else(|| ZoneError::NotFound {
                resource: "Zone",
                uri: uri.to_string(),
            })
    }

    /// Collection view over the zones owned by the given fabric.
    pub async fn get_zones(&self, fabric_id: &str, collection_uri: &str) -> ZoneResult<ZoneCollection> {
        let store = self.store.read().await;

        if !store.fabric_exists(fabric_id) {
            return Err(ZoneError::NotFound {
                resource: "Fabric",
                uri: fabric_id.to_string(),
            });
        }
        let members = store
            .list_by_fabric(fabric_id)
            .into_iter()
            .map(|record| Link::new(record.zone.odata_id.clone()))
            .collect();
        Ok(ZoneCollection::new(collection_uri, members))
    }
}

/// Exactly-one `Links.ContainedByZones` entry, rejected otherwise before
/// any external call is made.
fn single_contained_by(request: &CreateZoneRequest) -> ZoneResult<String> {
    let links = request.links.as_ref().ok_or(ZoneError::PropertyMissing {
        property: "Links",
    })?;
    match links.contained_by_zones.as_slice() {
        [only] => Ok(only.oid.clone()),
        _ => Err(ZoneError::PropertyMissing {
            property: "Links/ContainedByZones",
        }),
    }
}

/// Treat a missing parent container as an empty catalog during
/// pre-creation probes; everything else propagates.
fn benign_not_found<T>(result: Result<Vec<T>, AdapterError>) -> ZoneResult<Vec<T>> {
    match result {
        Ok(list) => Ok(list),
        Err(AdapterError::ObjectNotFound { .. }) => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// Allocate an identifier, stamp resource metadata and Enabled/OK status,
/// and persist the record into the directory.
fn persist_zone(
    store: &mut ZoneStore,
    fabric_id: &str,
    collection_uri: &str,
    request: &CreateZoneRequest,
) -> Zone {
    let id = Uuid::new_v4().to_string();
    let odata_id = format!("{}/{}", collection_uri, id);

    let links = request.links.as_ref().map(|links| ZoneLinks {
        contained_by_zones: links.contained_by_zones.clone(),
        contained_by_zones_count: links.contained_by_zones.len(),
        contains_zones: Vec::new(),
        contains_zones_count: 0,
    });

    let zone = Zone {
        odata_context: ZONE_ODATA_CONTEXT.to_string(),
        odata_id: odata_id.clone(),
        odata_type: ZONE_ODATA_TYPE.to_string(),
        id,
        name: request.name.clone(),
        description: request.description.clone(),
        zone_type: request.zone_type,
        status: Some(Status::enabled_ok()),
        links,
    };

    store.put(
        odata_id,
        ZoneRecord {
            fabric_id: fabric_id.to_string(),
            zone: zone.clone(),
        },
    );
    zone
}
