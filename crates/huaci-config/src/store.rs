use std::sync::Arc;

use tokio::sync::watch;

use crate::ConfigError;
use crate::settings::Settings;

/// Latest settings snapshot, swapped whole on every change.
///
/// Readers hold an `Arc<Settings>` for the duration of one lookup and never
/// observe a partially applied update.
pub struct SettingsStore {
    tx: watch::Sender<Arc<Settings>>,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Result<Self, ConfigError> {
        let initial = initial.validated()?;
        let (tx, _) = watch::channel(Arc::new(initial));
        Ok(Self { tx })
    }

    pub fn snapshot(&self) -> Arc<Settings> {
        self.tx.borrow().clone()
    }

    /// Validate and publish a full replacement. On error the previous
    /// snapshot stays in place.
    pub fn replace(&self, settings: Settings) -> Result<Arc<Settings>, ConfigError> {
        let settings = Arc::new(settings.validated()?);
        self.tx.send_replace(settings.clone());
        tracing::info!("settings snapshot replaced");
        Ok(settings)
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Settings>> {
        self.tx.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        let (tx, _) = watch::channel(Arc::new(Settings::default()));
        Self { tx }
    }
}
