use crate::{Settings, SettingsError};
use std::fs;
use std::path::Path;

pub fn save_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(settings)?;
    fs::write(path, contents)?;
    tracing::debug!(path = %path.display(), "saved settings");

    Ok(())
}
