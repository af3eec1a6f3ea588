//! Fabric controller adapter abstractions
//!
//! The lifecycle manager talks to the external fabric controller through
//! [`FabricControllerAdapter`]. Listing operations report a missing parent
//! container through [`AdapterError::ObjectNotFound`] so callers can treat
//! it as a benign condition during pre-creation probes without inspecting
//! message text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attributes of a tenant in the controller catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantAttributes {
    pub name: String,
    pub description: Option<String>,
}

/// Attributes of an application profile under a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationProfileAttributes {
    pub name: String,
    pub description: Option<String>,
}

/// Attributes of a VRF under a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VrfAttributes {
    pub name: String,
    pub description: Option<String>,
}

/// Attributes of a bridge domain under a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeDomainAttributes {
    pub name: String,
    pub description: Option<String>,
}

/// Errors surfaced by fabric controller adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The queried container does not exist in the controller catalog.
    /// Benign while probing for name collisions before creation.
    #[error("{class} not found under {scope}")]
    ObjectNotFound { class: String, scope: String },

    #[error("fabric controller request failed: {message}")]
    Api { message: String },

    #[error("fabric controller authentication failed: {message}")]
    Auth { message: String },

    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Operations the plugin requires from the external fabric controller,
/// scoped by tenant name where applicable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FabricControllerAdapter: Send + Sync {
    async fn list_tenants(&self) -> AdapterResult<Vec<TenantAttributes>>;
    async fn create_tenant(&self, name: &str, description: &str) -> AdapterResult<()>;
    async fn delete_tenant(&self, name: &str) -> AdapterResult<()>;

    async fn list_application_profiles(
        &self,
        tenant: &str,
    ) -> AdapterResult<Vec<ApplicationProfileAttributes>>;
    async fn create_application_profile(
        &self,
        name: &str,
        tenant: &str,
        description: &str,
    ) -> AdapterResult<()>;

    async fn list_vrfs(&self, tenant: &str) -> AdapterResult<Vec<VrfAttributes>>;
    async fn create_vrf(&self, name: &str, tenant: &str, description: &str) -> AdapterResult<()>;

    async fn list_bridge_domains(&self, tenant: &str)
        -> AdapterResult<Vec<BridgeDomainAttributes>>;
    async fn create_bridge_domain(
        &self,
        name: &str,
        tenant: &str,
        description: &str,
    ) -> AdapterResult<()>;
}
