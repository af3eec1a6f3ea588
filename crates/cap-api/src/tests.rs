//! Unit tests for the zone API surface

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cap_core::controller::{
    AdapterError, AdapterResult, ApplicationProfileAttributes, BridgeDomainAttributes,
    FabricControllerAdapter, TenantAttributes, VrfAttributes,
};
use cap_core::ZoneError;
use cap_model::ZoneType;

use crate::context::AppContext;
use crate::response::error_response;
use crate::zones::ZonesApi;

/// Stub controller: empty catalogs, every mutation accepted.
struct NullController;

#[async_trait]
impl FabricControllerAdapter for NullController {
    async fn list_tenants(&self) -> AdapterResult<Vec<TenantAttributes>> {
        Ok(Vec::new())
    }

    async fn create_tenant(&self, _name: &str, _description: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn delete_tenant(&self, _name: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn list_application_profiles(
        &self,
        tenant: &str,
    ) -> AdapterResult<Vec<ApplicationProfileAttributes>> {
        Err(AdapterError::ObjectNotFound {
            class: "fvAp".to_string(),
            scope: tenant.to_string(),
        })
    }

    async fn create_application_profile(
        &self,
        _name: &str,
        _tenant: &str,
        _description: &str,
    ) -> AdapterResult<()> {
        Ok(())
    }

    async fn list_vrfs(&self, tenant: &str) -> AdapterResult<Vec<VrfAttributes>> {
        Err(AdapterError::ObjectNotFound {
            class: "fvCtx".to_string(),
            scope: tenant.to_string(),
        })
    }

    async fn create_vrf(&self, _name: &str, _tenant: &str, _description: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn list_bridge_domains(
        &self,
        tenant: &str,
    ) -> AdapterResult<Vec<BridgeDomainAttributes>> {
        Err(AdapterError::ObjectNotFound {
            class: "fvBD".to_string(),
            scope: tenant.to_string(),
        })
    }

    async fn create_bridge_domain(
        &self,
        _name: &str,
        _tenant: &str,
        _description: &str,
    ) -> AdapterResult<()> {
        Ok(())
    }
}

fn test_app() -> Router {
    let context = AppContext::with_adapter(&["f1".to_string()], Arc::new(NullController));
    Router::new().merge(ZonesApi::router()).with_state(context)
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn lifecycle_errors_map_to_expected_statuses() {
    let cases = [
        (
            ZoneError::MalformedRequest {
                message: "bad".to_string(),
            },
            StatusCode::BAD_REQUEST,
            "MalformedJSON",
        ),
        (
            ZoneError::PropertyMissing { property: "Links" },
            StatusCode::BAD_REQUEST,
            "PropertyMissing",
        ),
        (
            ZoneError::NotFound {
                resource: "Zone",
                uri: "/z".to_string(),
            },
            StatusCode::NOT_FOUND,
            "ResourceNotFound",
        ),
        (
            ZoneError::AlreadyExists {
                resource: "DefaultZone",
                name: "T1".to_string(),
            },
            StatusCode::CONFLICT,
            "ResourceAlreadyExists",
        ),
        (
            ZoneError::CannotDelete {
                uri: "/z".to_string(),
            },
            StatusCode::NOT_ACCEPTABLE,
            "ResourceCannotBeDeleted",
        ),
        (
            ZoneError::NotImplemented {
                zone_type: ZoneType::Unknown,
            },
            StatusCode::NOT_IMPLEMENTED,
            "GeneralError",
        ),
        (
            ZoneError::Controller(AdapterError::Api {
                message: "boom".to_string(),
            }),
            StatusCode::BAD_REQUEST,
            "GeneralError",
        ),
    ];

    for (err, expected_status, expected_code) in cases {
        let (status, body) = error_response(&err);
        assert_eq!(status, expected_status, "status for {:?}", err);
        let value = serde_json::to_value(&body.0).unwrap();
        assert_eq!(
            value["error"]["MessageId"], expected_code,
            "code class for {:?}",
            err
        );
    }
}

#[test]
fn not_found_mapping_names_the_resource_pair() {
    let err = ZoneError::NotFound {
        resource: "Fabric",
        uri: "f9".to_string(),
    };
    let (_, body) = error_response(&err);
    let value = serde_json::to_value(&body.0).unwrap();
    assert_eq!(value["error"]["MessageArgs"][0], "Fabric");
    assert_eq!(value["error"]["MessageArgs"][1], "f9");
}

#[tokio::test]
async fn post_default_zone_returns_created_with_location() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/ODIM/v1/Fabrics/f1/Zones",
            serde_json::json!({"Name": "T1", "ZoneType": "Default"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = response_json(response).await;
    assert_eq!(body["@odata.id"], location);
    assert_eq!(body["Status"]["State"], "Enabled");
    assert_eq!(body["Status"]["Health"], "OK");
}

#[tokio::test]
async fn malformed_body_maps_to_bad_request() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/ODIM/v1/Fabrics/f1/Zones")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"]["MessageId"], "MalformedJSON");
}

#[tokio::test]
async fn unknown_fabric_collection_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ODIM/v1/Fabrics/nope/Zones")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"]["MessageId"], "ResourceNotFound");
}

#[tokio::test]
async fn unrecognized_zone_type_is_not_implemented() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/ODIM/v1/Fabrics/f1/Zones",
            serde_json::json!({"Name": "T1", "ZoneType": "ZoneOfRacks"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn created_zone_is_listed_then_deleted() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/ODIM/v1/Fabrics/f1/Zones",
            serde_json::json!({"Name": "T1", "ZoneType": "Default"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    let zone_uri = created["@odata.id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/ODIM/v1/Fabrics/f1/Zones")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let collection = response_json(response).await;
    assert_eq!(collection["Members@odata.count"], 1);
    assert_eq!(collection["Members"][0]["@odata.id"], zone_uri);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(zone_uri.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(zone_uri.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
