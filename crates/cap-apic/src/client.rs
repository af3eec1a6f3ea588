//! APIC REST client
//!
//! Implements [`FabricControllerAdapter`] over the controller's
//! managed-object REST API: session login, class queries parsed from the
//! `imdata` envelope, and managed-object creation/deletion posts.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use urlencoding::encode;

use cap_core::controller::{
    AdapterError, AdapterResult, ApplicationProfileAttributes, BridgeDomainAttributes,
    FabricControllerAdapter, TenantAttributes, VrfAttributes,
};

/// Error code the controller reports for a query against an object that
/// does not exist. Used for classification instead of message text.
const APIC_CODE_NOT_FOUND: &str = "103";

/// Connection settings for the APIC northbound API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApicConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Name and description attributes of a managed object, as carried inside
/// the `imdata` envelope.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct ManagedObject {
    name: String,
    #[serde(default)]
    descr: Option<String>,
}

/// APIC session client.
///
/// The login token is cached and refreshed once when the controller
/// reports an expired session.
pub struct ApicClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl ApicClient {
    pub fn new(config: ApicConfig) -> AdapterResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username,
            password: config.password,
            token: RwLock::new(None),
        })
    }

    /// Authenticate against `aaaLogin.json` and cache the session token.
    async fn login(&self) -> AdapterResult<String> {
        let url = format!("{}/api/aaaLogin.json", self.base_url);
        let payload = json!({
            "aaaUser": {
                "attributes": {
                    "name": self.username,
                    "pwd": self.password,
                }
            }
        });

        let response = self.http.post(&url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AdapterError::Auth {
                message: format!("login rejected with status {}", response.status()),
            });
        }

        let body: Value = response.json().await?;
        let token = parse_login_token(&body).ok_or_else(|| AdapterError::Auth {
            message: "login reply carried no session token".to_string(),
        })?;

        *self.token.write().await = Some(token.clone());
        debug!("APIC session established for {}", self.username);
        Ok(token)
    }

    async fn session_token(&self) -> AdapterResult<String> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }
        self.login().await
    }

    /// Send an authenticated request, re-logging in once when the session
    /// has expired.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> AdapterResult<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.session_token().await?;

        let mut response = self.send(&method, &url, body, &token).await?;
        if response.status() == StatusCode::FORBIDDEN {
            warn!("APIC session expired, re-authenticating");
            let token = self.login().await?;
            response = self.send(&method, &url, body, &token).await?;
        }

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
        token: &str,
    ) -> AdapterResult<reqwest::Response> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Cookie", format!("APIC-cookie={}", token));
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Run a class query and return the matching managed objects.
    ///
    /// A reply reporting the scope object as nonexistent maps to
    /// [`AdapterError::ObjectNotFound`]; the caller decides whether that is
    /// benign.
    async fn get_class(&self, path: &str, class: &str, scope: &str) -> AdapterResult<Vec<ManagedObject>> {
        let (status, body) = self.request(Method::GET, path, None).await?;
        if status.is_success() {
            return parse_class_objects(&body, class);
        }
        Err(classify_failure(status, &body, class, scope))
    }

    /// Post a managed-object payload.
    async fn post_mo(&self, path: &str, payload: Value, class: &str, scope: &str) -> AdapterResult<()> {
        let (status, body) = self.request(Method::POST, path, Some(&payload)).await?;
        if status.is_success() {
            return Ok(());
        }
        Err(classify_failure(status, &body, class, scope))
    }

    /// Delete the managed object at the given path.
    async fn delete_mo(&self, path: &str, class: &str, scope: &str) -> AdapterResult<()> {
        let (status, body) = self.request(Method::DELETE, path, None).await?;
        if status.is_success() {
            return Ok(());
        }
        Err(classify_failure(status, &body, class, scope))
    }
}

#[async_trait]
impl FabricControllerAdapter for ApicClient {
    async fn list_tenants(&self) -> AdapterResult<Vec<TenantAttributes>> {
        let objects = self
            .get_class("/api/node/class/fvTenant.json", "fvTenant", "uni")
            .await?;
        Ok(objects
            .into_iter()
            .map(|mo| TenantAttributes {
                name: mo.name,
                description: mo.descr,
            })
            .collect())
    }

    async fn create_tenant(&self, name: &str, description: &str) -> AdapterResult<()> {
        let path = format!("/api/node/mo/uni/tn-{}.json", encode(name));
        let payload = json!({
            "fvTenant": {
                "attributes": {
                    "name": name,
                    "descr": description,
                }
            }
        });
        self.post_mo(&path, payload, "fvTenant", name).await
    }

    async fn delete_tenant(&self, name: &str) -> AdapterResult<()> {
        let path = format!("/api/node/mo/uni/tn-{}.json", encode(name));
        self.delete_mo(&path, "fvTenant", name).await
    }

    async fn list_application_profiles(
        &self,
        tenant: &str,
    ) -> AdapterResult<Vec<ApplicationProfileAttributes>> {
        let path = format!(
            "/api/node/mo/uni/tn-{}.json?query-target=children&target-subtree-class=fvAp",
            encode(tenant)
        );
        let objects = self.get_class(&path, "fvAp", tenant).await?;
        Ok(objects
            .into_iter()
            .map(|mo| ApplicationProfileAttributes {
                name: mo.name,
                description: mo.descr,
            })
            .collect())
    }

    async fn create_application_profile(
        &self,
        name: &str,
        tenant: &str,
        description: &str,
    ) -> AdapterResult<()> {
        let path = format!(
            "/api/node/mo/uni/tn-{}/ap-{}.json",
            encode(tenant),
            encode(name)
        );
        let payload = json!({
            "fvAp": {
                "attributes": {
                    "name": name,
                    "descr": description,
                }
            }
        });
        self.post_mo(&path, payload, "fvAp", tenant).await
    }

    async fn list_vrfs(&self, tenant: &str) -> AdapterResult<Vec<VrfAttributes>> {
        let path = format!(
            "/api/node/mo/uni/tn-{}.json?query-target=children&target-subtree-class=fvCtx",
            encode(tenant)
        );
        let objects = self.get_class(&path, "fvCtx", tenant).await?;
        Ok(objects
            .into_iter()
            .map(|mo| VrfAttributes {
                name: mo.name,
                description: mo.descr,
            })
            .collect())
    }

    async fn create_vrf(&self, name: &str, tenant: &str, description: &str) -> AdapterResult<()> {
        let path = format!(
            "/api/node/mo/uni/tn-{}/ctx-{}.json",
            encode(tenant),
            encode(name)
        );
        let payload = json!({
            "fvCtx": {
                "attributes": {
                    "name": name,
                    "descr": description,
                }
            }
        });
        self.post_mo(&path, payload, "fvCtx", tenant).await
    }

    async fn list_bridge_domains(
        &self,
        tenant: &str,
    ) -> AdapterResult<Vec<BridgeDomainAttributes>> {
        let path = format!(
            "/api/node/mo/uni/tn-{}.json?query-target=children&target-subtree-class=fvBD",
            encode(tenant)
        );
        let objects = self.get_class(&path, "fvBD", tenant).await?;
        Ok(objects
            .into_iter()
            .map(|mo| BridgeDomainAttributes {
                name: mo.name,
                description: mo.descr,
            })
            .collect())
    }

    async fn create_bridge_domain(
        &self,
        name: &str,
        tenant: &str,
        description: &str,
    ) -> AdapterResult<()> {
        let path = format!(
            "/api/node/mo/uni/tn-{}/BD-{}.json",
            encode(tenant),
            encode(name)
        );
        let payload = json!({
            "fvBD": {
                "attributes": {
                    "name": name,
                    "descr": description,
                }
            }
        });
        self.post_mo(&path, payload, "fvBD", tenant).await
    }
}

/// Token from the `aaaLogin` reply envelope.
fn parse_login_token(body: &Value) -> Option<String> {
    body.get("imdata")?
        .get(0)?
        .get("aaaLogin")?
        .get("attributes")?
        .get("token")?
        .as_str()
        .map(str::to_string)
}

/// Objects of `class` from an `imdata` reply envelope.
fn parse_class_objects(body: &Value, class: &str) -> AdapterResult<Vec<ManagedObject>> {
    let items = body
        .get("imdata")
        .and_then(Value::as_array)
        .ok_or_else(|| AdapterError::Api {
            message: "reply carried no imdata envelope".to_string(),
        })?;

    let mut objects = Vec::new();
    for item in items {
        if let Some(attributes) = item.get(class).and_then(|mo| mo.get("attributes")) {
            objects.push(serde_json::from_value(attributes.clone())?);
        }
    }
    Ok(objects)
}

/// Error code and text from an `imdata` error reply.
fn parse_error_attributes(body: &Value) -> Option<(String, String)> {
    let attributes = body
        .get("imdata")?
        .get(0)?
        .get("error")?
        .get("attributes")?;
    let code = attributes.get("code")?.as_str()?.to_string();
    let text = attributes
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((code, text))
}

/// Map a failed reply onto the adapter error taxonomy. The controller's
/// numeric not-found code and plain 404 replies become
/// [`AdapterError::ObjectNotFound`]; everything else is an API failure.
fn classify_failure(status: StatusCode, body: &Value, class: &str, scope: &str) -> AdapterError {
    match parse_error_attributes(body) {
        Some((code, _)) if code == APIC_CODE_NOT_FOUND => AdapterError::ObjectNotFound {
            class: class.to_string(),
            scope: scope.to_string(),
        },
        Some((code, text)) => AdapterError::Api {
            message: format!("controller replied {} (code {}): {}", status, code, text),
        },
        None if status == StatusCode::NOT_FOUND => AdapterError::ObjectNotFound {
            class: class.to_string(),
            scope: scope.to_string(),
        },
        None => AdapterError::Api {
            message: format!("controller replied {}", status),
        },
    }
}
