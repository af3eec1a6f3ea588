//! Shared application context

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use cap_apic::ApicClient;
use cap_core::{FabricControllerAdapter, ZoneLifecycleManager, ZoneStore};
use cap_model::FabricRecord;

use crate::config::PluginConfig;

/// Wiring shared by all request handlers.
#[derive(Clone)]
pub struct AppContext {
    pub manager: Arc<ZoneLifecycleManager>,
    pub store: Arc<RwLock<ZoneStore>>,
}

impl AppContext {
    /// Build the directory store, the APIC driver and the lifecycle manager
    /// from the loaded configuration.
    pub fn bootstrap(config: &PluginConfig) -> Result<Arc<Self>> {
        let apic = Arc::new(ApicClient::new(config.apic.clone())?);
        Ok(Self::with_adapter(&config.fabrics, apic))
    }

    /// Context over an arbitrary adapter implementation; used by bootstrap
    /// and by tests.
    pub fn with_adapter(
        fabrics: &[String],
        adapter: Arc<dyn FabricControllerAdapter>,
    ) -> Arc<Self> {
        let mut store = ZoneStore::new();
        for fabric in fabrics {
            store.register_fabric(FabricRecord::new(fabric.clone()));
        }
        let store = Arc::new(RwLock::new(store));
        let manager = Arc::new(ZoneLifecycleManager::new(store.clone(), adapter));
        Arc::new(Self { manager, store })
    }
}
