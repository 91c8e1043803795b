//! Command handlers for mixer control.
//!
//! These functions are what the UI invokes. Each command locks the mixer,
//! performs one operation, and returns a fresh [`SessionsResponse`] so the
//! UI stays in sync without waiting for the next poll.

use crate::dto::{MasterUpdateEvent, MixerEvent, SessionsResponse};
use crate::state::AppState;
use mixer_core::{MixerController, MixerError};
use std::sync::MutexGuard;

pub type CommandResult<T> = Result<T, String>;

fn lock_mixer(state: &AppState) -> CommandResult<MutexGuard<'_, MixerController>> {
    state
        .mixer
        .lock()
        .map_err(|_| "Failed to acquire mixer lock".to_string())
}

fn command_error(command: &str, pid: Option<u32>, error: MixerError) -> String {
    if error.is_stale_session() {
        tracing::debug!(command, ?pid, "session went away: {error}");
    } else {
        tracing::warn!(command, ?pid, "command failed: {error}");
    }
    error.to_string()
}

fn respond(mixer: &MixerController, command: &str) -> CommandResult<SessionsResponse> {
    mixer
        .get_sessions()
        .map(Into::into)
        .map_err(|e| command_error(command, None, e))
}

// ============================================================================
// Session Commands
// ============================================================================

/// Current sessions and the implied solo target.
pub fn get_sessions(state: &AppState) -> CommandResult<SessionsResponse> {
    let mixer = lock_mixer(state)?;
    respond(&mixer, "get_sessions")
}

/// Solo a session, or undo an existing solo.
pub fn toggle_solo(pid: u32, state: &AppState) -> CommandResult<SessionsResponse> {
    let mixer = lock_mixer(state)?;
    mixer
        .toggle_solo(pid)
        .map_err(|e| command_error("toggle_solo", Some(pid), e))?;
    respond(&mixer, "toggle_solo")
}

/// Set a session's volume (0.0 to 1.0).
pub fn set_session_volume(pid: u32, volume: f32, state: &AppState) -> CommandResult<SessionsResponse> {
    let mixer = lock_mixer(state)?;
    mixer
        .set_session_volume(pid, volume)
        .map_err(|e| command_error("set_session_volume", Some(pid), e))?;
    respond(&mixer, "set_session_volume")
}

pub fn set_session_mute(pid: u32, muted: bool, state: &AppState) -> CommandResult<SessionsResponse> {
    let mixer = lock_mixer(state)?;
    mixer
        .set_session_mute(pid, muted)
        .map_err(|e| command_error("set_session_mute", Some(pid), e))?;
    respond(&mixer, "set_session_mute")
}

pub fn toggle_session_mute(pid: u32, state: &AppState) -> CommandResult<SessionsResponse> {
    let mixer = lock_mixer(state)?;
    mixer
        .toggle_session_mute(pid)
        .map_err(|e| command_error("toggle_session_mute", Some(pid), e))?;
    respond(&mixer, "toggle_session_mute")
}

/// Exempt a session from solo and background-mute cascades, or lift the
/// exemption.
pub fn toggle_session_lock(pid: u32, state: &AppState) -> CommandResult<SessionsResponse> {
    let mut mixer = lock_mixer(state)?;
    mixer
        .toggle_session_lock(pid)
        .map_err(|e| command_error("toggle_session_lock", Some(pid), e))?;
    respond(&mixer, "toggle_session_lock")
}

/// Toggle background mute for the session's application and persist the
/// new set of paths.
pub fn toggle_background_mute_for_session(
    pid: u32,
    state: &AppState,
) -> CommandResult<SessionsResponse> {
    let mut mixer = lock_mixer(state)?;
    let before = mixer.background_mute_paths();
    let result = mixer.toggle_background_mute_for_session(pid);

    let after = mixer.background_mute_paths();
    if after != before {
        persist_background_mute_paths(state, after);
    }
    result.map_err(|e| command_error("toggle_background_mute_for_session", Some(pid), e))?;
    respond(&mixer, "toggle_background_mute_for_session")
}

// ============================================================================
// Master Commands
// ============================================================================

pub fn get_master(state: &AppState) -> CommandResult<MasterUpdateEvent> {
    let mixer = lock_mixer(state)?;
    mixer
        .master()
        .map(Into::into)
        .map_err(|e| command_error("get_master", None, e))
}

/// Set the master volume (0.0 to 1.0).
pub fn set_master_volume(volume: f32, state: &AppState) -> CommandResult<MasterUpdateEvent> {
    let mixer = lock_mixer(state)?;
    mixer
        .set_master_volume(volume)
        .map_err(|e| command_error("set_master_volume", None, e))?;
    mixer
        .master()
        .map(Into::into)
        .map_err(|e| command_error("set_master_volume", None, e))
}

pub fn set_master_mute(muted: bool, state: &AppState) -> CommandResult<MasterUpdateEvent> {
    let mixer = lock_mixer(state)?;
    mixer
        .set_master_mute(muted)
        .map_err(|e| command_error("set_master_mute", None, e))?;
    mixer
        .master()
        .map(Into::into)
        .map_err(|e| command_error("set_master_mute", None, e))
}

// ============================================================================
// Settings Commands
// ============================================================================

/// Re-announce settings the UI renders from.
pub fn refresh_settings(state: &AppState) -> CommandResult<()> {
    let show_session_pid = state
        .settings
        .lock()
        .map_err(|_| "Failed to acquire settings lock".to_string())?
        .show_session_pid;

    state.emit(MixerEvent::SessionPidVisibilityModified(show_session_pid));
    Ok(())
}

pub fn set_show_session_pid(show: bool, state: &AppState) -> CommandResult<()> {
    {
        let mut settings = state
            .settings
            .lock()
            .map_err(|_| "Failed to acquire settings lock".to_string())?;
        settings.show_session_pid = show;
        save_settings(state, &settings);
    }
    refresh_settings(state)
}

fn persist_background_mute_paths(state: &AppState, paths: Vec<String>) {
    let Ok(mut settings) = state.settings.lock() else {
        tracing::warn!("settings lock poisoned; background mute paths not persisted");
        return;
    };
    settings.background_mute_paths = paths.into_iter().collect();
    save_settings(state, &settings);
}

fn save_settings(state: &AppState, settings: &mixer_settings::Settings) {
    let Some(path) = state.settings_path.as_deref() else {
        return;
    };
    if let Err(e) = mixer_settings::save_to(path, settings) {
        tracing::warn!(path = %path.display(), "failed to save settings: {e}");
    }
}
