//! HTTP server exposing the fabric zone API

use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use cap_api::{AppContext, PluginConfig, ZonesApi};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let config_path = std::env::var("CAP_CONFIG").ok();
    let config = PluginConfig::load(config_path.as_deref())?;

    let context = AppContext::bootstrap(&config)?;

    let app = Router::new()
        .merge(ZonesApi::router())
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(context.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    log::info!("starting API server on http://{}", addr);
    log::info!("available endpoints:");
    log::info!("  GET    /ODIM/v1/Fabrics/{{fabric_id}}/Zones");
    log::info!("  POST   /ODIM/v1/Fabrics/{{fabric_id}}/Zones");
    log::info!("  GET    /ODIM/v1/Fabrics/{{fabric_id}}/Zones/{{zone_id}}");
    log::info!("  DELETE /ODIM/v1/Fabrics/{{fabric_id}}/Zones/{{zone_id}}");
    log::info!("  GET    /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "components": {
            "zone_api": "ok"
        }
    }))
}
