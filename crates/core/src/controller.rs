//! The mixer facade the host talks to.
//!
//! Owns the [`SessionRegistry`] and the engines, and threads the registry
//! through every engine call. All methods take `&mut self` or `&self`; the
//! host serializes access.

use std::sync::Arc;

use crate::background::BackgroundMuteEngine;
use crate::error::MixerError;
use crate::gateway::{AudioDeviceGateway, FocusReceiver, WindowFocusGateway};
use crate::registry::SessionRegistry;
use crate::session::{MasterState, session_by_pid, validate_volume};
use crate::snapshot::{SessionSnapshot, SessionSnapshotProducer};
use crate::solo::{SoloEngine, SoloOutcome};

pub struct MixerController {
    audio: Arc<dyn AudioDeviceGateway>,
    registry: SessionRegistry,
    solo: SoloEngine,
    background: BackgroundMuteEngine,
    snapshots: SessionSnapshotProducer,
}

impl MixerController {
    /// Seed the registry with persisted background-mute paths and subscribe
    /// to focus changes.
    pub fn init<I, S>(
        audio: Arc<dyn AudioDeviceGateway>,
        focus: Arc<dyn WindowFocusGateway>,
        initial_background_mute_paths: I,
    ) -> Result<Self, MixerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = SessionRegistry::from_paths(initial_background_mute_paths);
        let background = BackgroundMuteEngine::new(audio.clone(), focus)?;
        tracing::info!(
            background_mute_paths = registry.background_mute_paths().count(),
            "mixer controller initialized"
        );

        Ok(Self {
            solo: SoloEngine::new(audio.clone()),
            snapshots: SessionSnapshotProducer::new(audio.clone()),
            audio,
            registry,
            background,
        })
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn get_sessions(&self) -> Result<SessionSnapshot, MixerError> {
        self.snapshots.snapshot(&self.registry)
    }

    pub fn master(&self) -> Result<MasterState, MixerError> {
        Ok(self.audio.master()?)
    }

    pub fn set_master_volume(&self, volume: f32) -> Result<(), MixerError> {
        let volume = validate_volume(volume)?;
        self.audio.set_master_volume(volume)?;
        Ok(())
    }

    pub fn set_master_mute(&self, muted: bool) -> Result<(), MixerError> {
        self.audio.set_master_muted(muted)?;
        Ok(())
    }

    pub fn session_volume(&self, pid: u32) -> Result<f32, MixerError> {
        Ok(session_by_pid(self.audio.as_ref(), pid)?.volume)
    }

    pub fn set_session_volume(&self, pid: u32, volume: f32) -> Result<(), MixerError> {
        let volume = validate_volume(volume)?;
        let record = session_by_pid(self.audio.as_ref(), pid)?;
        self.audio.set_volume(&record.id, volume)?;
        tracing::debug!(pid, volume, "set session volume");
        Ok(())
    }

    pub fn is_session_muted(&self, pid: u32) -> Result<bool, MixerError> {
        Ok(session_by_pid(self.audio.as_ref(), pid)?.muted)
    }

    pub fn set_session_mute(&self, pid: u32, muted: bool) -> Result<(), MixerError> {
        let record = session_by_pid(self.audio.as_ref(), pid)?;
        self.audio.set_muted(&record.id, muted)?;
        tracing::debug!(pid, muted, "set session mute");
        Ok(())
    }

    /// Flip the mute state of `pid`. Returns the new state.
    pub fn toggle_session_mute(&self, pid: u32) -> Result<bool, MixerError> {
        let record = session_by_pid(self.audio.as_ref(), pid)?;
        let muted = !record.muted;
        self.audio.set_muted(&record.id, muted)?;
        tracing::debug!(pid, muted, "toggled session mute");
        Ok(muted)
    }

    pub fn toggle_solo(&self, pid: u32) -> Result<SoloOutcome, MixerError> {
        self.solo.toggle_solo(&self.registry, pid)
    }

    /// Lock or unlock `pid`. Unlocking never needs a live session, so stale
    /// locks can always be cleared. Returns the new lock state.
    pub fn toggle_session_lock(&mut self, pid: u32) -> Result<bool, MixerError> {
        let current_muted = if self.registry.is_locked(pid) {
            false
        } else {
            session_by_pid(self.audio.as_ref(), pid)?.muted
        };

        let locked = self.registry.toggle_lock(pid, current_muted);
        tracing::info!(pid, locked, "toggled session lock");
        Ok(locked)
    }

    /// Returns whether background mute is enabled for the session's
    /// application afterwards.
    pub fn toggle_background_mute_for_session(&mut self, pid: u32) -> Result<bool, MixerError> {
        self.background
            .toggle_unfocused_session(&mut self.registry, pid)
    }

    pub fn background_mute_paths(&self) -> Vec<String> {
        self.registry
            .background_mute_paths()
            .map(str::to_string)
            .collect()
    }

    pub fn handle_focus_changed(&self, active_path: &str) -> Result<usize, MixerError> {
        self.background
            .handle_focus_changed(&self.registry, active_path)
    }

    pub fn drain_pending_focus_events(&mut self) -> Result<usize, MixerError> {
        self.background
            .drain_pending_focus_events(&self.registry)
    }

    pub fn take_focus_events(&mut self) -> Option<FocusReceiver> {
        self.background.take_focus_events()
    }

    /// Release the focus subscription so no callback fires into a torn-down
    /// registry. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.background.is_subscribed() {
            self.background.release();
            tracing::info!("mixer controller shut down");
        }
    }
}
