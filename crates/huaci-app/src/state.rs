use std::sync::Arc;

use huaci_config::{HostConfig, Settings, SettingsStore};
use huaci_core::LookupService;

pub struct AppState {
    pub config: HostConfig,
    pub settings: Arc<SettingsStore>,
    pub lookup: LookupService,
}

impl AppState {
    pub fn new(config: HostConfig, settings: Settings) -> anyhow::Result<Self> {
        let settings = Arc::new(SettingsStore::new(settings)?);
        let lookup = LookupService::new(&config, settings.clone())?;

        Ok(Self {
            config,
            settings,
            lookup,
        })
    }
}
