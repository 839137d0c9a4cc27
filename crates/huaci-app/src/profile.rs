use std::fs;
use std::path::Path;

use huaci_config::Settings;

/// Load the settings profile, or defaults when there is none yet
pub fn load_profile(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        tracing::info!("No settings profile configured, using defaults");
        return Ok(Settings::default());
    };

    if !path.exists() {
        tracing::warn!("Profile {} not found, using defaults", path.display());
        return Ok(Settings::default());
    }

    let data = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&data)?;
    let settings = Settings::from_value(value)?;
    tracing::info!("Loaded settings profile from {}", path.display());
    Ok(settings)
}

/// Write the settings as a plain camelCase mapping
pub fn save_profile(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)?;
    tracing::debug!("Saved settings profile to {}", path.display());
    Ok(())
}
