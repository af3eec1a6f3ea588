//! ACI Fabric Plugin API
//!
//! REST endpoints translating the northbound zone resources onto the
//! lifecycle manager.

pub mod config;
pub mod context;
pub mod response;
pub mod zones;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, PluginConfig};
pub use context::AppContext;
pub use zones::ZonesApi;
