//! Zone endpoints

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use cap_model::{CreateZoneRequest, Zone, ZoneCollection};

use crate::context::AppContext;
use crate::response::{error_response, malformed_json, ApiError};

/// Zone API handler.
pub struct ZonesApi;

impl ZonesApi {
    /// Get API router
    pub fn router() -> Router<Arc<AppContext>> {
        Router::new()
            .route(
                "/ODIM/v1/Fabrics/:fabric_id/Zones",
                get(get_zones).post(create_zone),
            )
            .route(
                "/ODIM/v1/Fabrics/:fabric_id/Zones/:zone_id",
                get(get_zone).delete(delete_zone),
            )
    }
}

fn collection_uri(fabric_id: &str) -> String {
    format!("/ODIM/v1/Fabrics/{}/Zones", fabric_id)
}

fn zone_uri(fabric_id: &str, zone_id: &str) -> String {
    format!("{}/{}", collection_uri(fabric_id), zone_id)
}

/// List the zones of a fabric.
pub async fn get_zones(
    State(context): State<Arc<AppContext>>,
    Path(fabric_id): Path<String>,
) -> Result<Json<ZoneCollection>, ApiError> {
    context
        .manager
        .get_zones(&fabric_id, &collection_uri(&fabric_id))
        .await
        .map(Json)
        .map_err(|err| {
            log::error!("listing zones of fabric {} failed: {}", fabric_id, err);
            error_response(&err)
        })
}

/// Fetch a single zone record.
pub async fn get_zone(
    State(context): State<Arc<AppContext>>,
    Path((fabric_id, zone_id)): Path<(String, String)>,
) -> Result<Json<Zone>, ApiError> {
    let uri = zone_uri(&fabric_id, &zone_id);
    context
        .manager
        .get_zone(&fabric_id, &uri)
        .await
        .map(Json)
        .map_err(|err| {
            log::error!("fetching zone {} failed: {}", uri, err);
            error_response(&err)
        })
}

/// Create a zone under a fabric.
pub async fn create_zone(
    State(context): State<Arc<AppContext>>,
    Path(fabric_id): Path<String>,
    payload: Result<Json<CreateZoneRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        log::error!(
            "error while trying to get JSON body from the request: {}",
            rejection.body_text()
        );
        malformed_json(rejection.body_text())
    })?;

    let created = context
        .manager
        .create_zone(&fabric_id, &collection_uri(&fabric_id), request)
        .await
        .map_err(|err| {
            log::error!("zone creation under fabric {} failed: {}", fabric_id, err);
            error_response(&err)
        })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, created.location)],
        Json(created.zone),
    ))
}

/// Delete a zone.
pub async fn delete_zone(
    State(context): State<Arc<AppContext>>,
    Path((fabric_id, zone_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let uri = zone_uri(&fabric_id, &zone_id);
    context
        .manager
        .delete_zone(&fabric_id, &uri)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|err| {
            log::error!("deleting zone {} failed: {}", uri, err);
            error_response(&err)
        })
}
