use crate::error::MixerError;
use crate::gateway::AudioDeviceGateway;

/// Label used for the session the gateway reports without a name.
pub const SYSTEM_SESSION_NAME: &str = "System Volume";

/// Raw session row as reported by the audio gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub app_path: String,
    pub display_name: String,
    pub volume: f32,
    pub muted: bool,
}

impl SessionRecord {
    pub fn pid(&self) -> u32 {
        parse_pid(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterState {
    pub volume: f32,
    pub muted: bool,
}

impl Default for MasterState {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

/// A live session merged with the registry-derived flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub pid: u32,
    pub display_name: String,
    pub volume: f32,
    pub is_muted: bool,
    pub background_mute_enabled: bool,
    pub is_locked: bool,
}

/// Extract the pid from a gateway session id.
///
/// The pid lives in the third `%`-separated field. Non-digit characters are
/// stripped; a missing field or one without digits yields 0, the system
/// session.
pub fn parse_pid(session_id: &str) -> u32 {
    let Some(field) = session_id.split('%').nth(2) else {
        return 0;
    };

    let digits: String = field.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Short application name for an executable path: the last path segment up
/// to its first `.`. Returns `None` when nothing usable is left.
pub fn application_name(app_path: &str) -> Option<String> {
    let segment = app_path.rsplit(['\\', '/']).next()?.trim();
    let name = segment.split('.').next()?;

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Name shown for a session, or `None` if it should not be surfaced at all.
pub fn display_name(record: &SessionRecord) -> Option<String> {
    if record.display_name.is_empty() {
        return Some(SYSTEM_SESSION_NAME.to_string());
    }
    application_name(&record.app_path)
}

pub fn validate_volume(volume: f32) -> Result<f32, MixerError> {
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(MixerError::InvalidVolume(volume))
    }
}

/// Look up the first live session owned by `pid`.
pub fn session_by_pid(
    audio: &dyn AudioDeviceGateway,
    pid: u32,
) -> Result<SessionRecord, MixerError> {
    audio
        .list_sessions()?
        .into_iter()
        .find(|record| record.pid() == pid)
        .ok_or(MixerError::SessionNotFound(pid))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(app_path: &str, display_name: &str) -> SessionRecord {
        SessionRecord {
            id: "{0.0.0.00000000}.{x}|app%b{0}|1%b42".to_string(),
            app_path: app_path.to_string(),
            display_name: display_name.to_string(),
            volume: 1.0,
            muted: false,
        }
    }

    #[test]
    fn test_parse_pid_from_windows_style_id() {
        let id = r"{0.0.0.00000000}.{5f3e}|\Device\HarddiskVolume3\Apps\chrome.exe%b{00000000-0000-0000-0000-000000000000}|1%b12345";
        assert_eq!(parse_pid(id), 12345);
    }

    #[test]
    fn test_parse_pid_percent_delimited_field() {
        assert_eq!(parse_pid("abc%def%1234%"), 1234);
    }

    #[test]
    fn test_parse_pid_without_digits_is_system() {
        assert_eq!(parse_pid("abc%def%b{system}"), 0);
        assert_eq!(parse_pid("abc%def%"), 0);
    }

    #[test]
    fn test_parse_pid_missing_field_is_system() {
        assert_eq!(parse_pid(""), 0);
        assert_eq!(parse_pid("no-delimiters"), 0);
        assert_eq!(parse_pid("one%two"), 0);
    }

    #[test]
    fn test_parse_pid_overflow_is_system() {
        assert_eq!(parse_pid("a%b%99999999999999"), 0);
    }

    #[test]
    fn test_application_name_strips_extension() {
        assert_eq!(
            application_name(r"C:\Program Files\Mozilla Firefox\firefox.exe"),
            Some("firefox".to_string())
        );
        assert_eq!(
            application_name("/usr/lib/spotify/spotify.bin.real"),
            Some("spotify".to_string())
        );
        assert_eq!(application_name("discord"), Some("discord".to_string()));
    }

    #[test]
    fn test_application_name_rejects_empty_segments() {
        assert_eq!(application_name(""), None);
        assert_eq!(application_name(r"C:\Apps\"), None);
        assert_eq!(application_name("/opt/.hidden"), None);
    }

    #[test]
    fn test_display_name_uses_system_label_for_unnamed_session() {
        assert_eq!(
            display_name(&record("", "")),
            Some(SYSTEM_SESSION_NAME.to_string())
        );
        assert_eq!(
            display_name(&record(r"C:\Games\game.exe", "Game")),
            Some("game".to_string())
        );
        assert_eq!(display_name(&record("", "Named")), None);
    }

    #[test]
    fn test_validate_volume_bounds() {
        assert_eq!(validate_volume(0.0).unwrap(), 0.0);
        assert_eq!(validate_volume(1.0).unwrap(), 1.0);
        assert!(matches!(
            validate_volume(-0.01),
            Err(MixerError::InvalidVolume(_))
        ));
        assert!(matches!(
            validate_volume(1.01),
            Err(MixerError::InvalidVolume(_))
        ));
        assert!(matches!(
            validate_volume(f32::NAN),
            Err(MixerError::InvalidVolume(_))
        ));
    }
}
