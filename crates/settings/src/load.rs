use crate::{Settings, SettingsError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read settings from `path`. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e.into()),
    };

    Ok(toml::from_str(&contents)?)
}

/// Like [`load_from`], but an unreadable or malformed file is logged and
/// replaced by the defaults.
pub fn load_or_default(path: &Path) -> Settings {
    match load_from(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable settings: {e}");
            Settings::default()
        }
    }
}
