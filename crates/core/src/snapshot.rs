use std::sync::Arc;

use crate::error::MixerError;
use crate::gateway::AudioDeviceGateway;
use crate::registry::SessionRegistry;
use crate::session::{Session, display_name};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub sessions: Vec<Session>,
    /// The only unmuted session, if exactly one is unmuted.
    pub implied_solo: Option<Session>,
}

/// Merges live gateway data with registry flags.
pub struct SessionSnapshotProducer {
    audio: Arc<dyn AudioDeviceGateway>,
}

impl SessionSnapshotProducer {
    pub fn new(audio: Arc<dyn AudioDeviceGateway>) -> Self {
        Self { audio }
    }

    pub fn snapshot(&self, registry: &SessionRegistry) -> Result<SessionSnapshot, MixerError> {
        let records = self.audio.list_sessions()?;

        let mut unmuted = records.iter().filter(|record| !record.muted);
        let lone_unmuted_pid = match (unmuted.next(), unmuted.next()) {
            (Some(record), None) => Some(record.pid()),
            _ => None,
        };

        let mut sessions = Vec::with_capacity(records.len());
        let mut implied_solo = None;

        for record in &records {
            let Some(name) = display_name(record) else {
                tracing::trace!(id = %record.id, app_path = %record.app_path, "skipping session without a usable name");
                continue;
            };

            let pid = record.pid();
            let session = Session {
                pid,
                display_name: name,
                volume: record.volume,
                is_muted: record.muted,
                background_mute_enabled: registry.is_background_muted(&record.app_path),
                is_locked: registry.is_locked(pid),
            };

            if !record.muted && lone_unmuted_pid == Some(pid) {
                implied_solo = Some(session.clone());
            }
            sessions.push(session);
        }

        Ok(SessionSnapshot {
            sessions,
            implied_solo,
        })
    }
}
