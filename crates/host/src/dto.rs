//! Data Transfer Objects (DTOs) for communication between the host and the UI.
//!
//! These types are serialized to JSON and pushed to the frontend. They are
//! snapshots of the mixer state at a point in time.

use mixer_core::{MasterState, Session, SessionSnapshot};
use serde::{Deserialize, Serialize};

/// One audio session as the UI shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub pid: u32,
    pub name: String,
    pub volume: f32,
    pub is_muted: bool,
    pub background_mute_enabled: bool,
    pub is_locked: bool,
}

/// Returned by `get_sessions` and every session command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsResponse {
    pub sessions: Vec<SessionDto>,
    pub implied_solo: Option<SessionDto>,
}

/// Payload of the `master-update` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterUpdateEvent {
    pub volume: f32,
    pub muted: bool,
}

/// Events pushed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum MixerEvent {
    MasterUpdate(MasterUpdateEvent),
    SessionListUpdate(Vec<SessionDto>),
    SessionPidVisibilityModified(bool),
}

impl MixerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MixerEvent::MasterUpdate(_) => "master-update",
            MixerEvent::SessionListUpdate(_) => "session-list-update",
            MixerEvent::SessionPidVisibilityModified(_) => "session-pid-visibility-modified",
        }
    }
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            pid: session.pid,
            name: session.display_name,
            volume: session.volume,
            is_muted: session.is_muted,
            background_mute_enabled: session.background_mute_enabled,
            is_locked: session.is_locked,
        }
    }
}

impl From<SessionSnapshot> for SessionsResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            sessions: snapshot.sessions.into_iter().map(Into::into).collect(),
            implied_solo: snapshot.implied_solo.map(Into::into),
        }
    }
}

impl From<MasterState> for MasterUpdateEvent {
    fn from(master: MasterState) -> Self {
        Self {
            volume: master.volume,
            muted: master.muted,
        }
    }
}
