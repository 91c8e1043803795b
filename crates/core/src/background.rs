use std::sync::Arc;

use crate::error::MixerError;
use crate::gateway::{AudioDeviceGateway, FocusReceiver, FocusSubscription, WindowFocusGateway};
use crate::registry::SessionRegistry;
use crate::session::session_by_pid;

/// Mutes registered applications whenever their window loses focus.
///
/// Decisions are made per application path rather than per pid: every
/// session of one executable follows the same focus state.
pub struct BackgroundMuteEngine {
    audio: Arc<dyn AudioDeviceGateway>,
    focus: Arc<dyn WindowFocusGateway>,
    subscription: FocusSubscription,
}

impl BackgroundMuteEngine {
    pub fn new(
        audio: Arc<dyn AudioDeviceGateway>,
        focus: Arc<dyn WindowFocusGateway>,
    ) -> Result<Self, MixerError> {
        let subscription = FocusSubscription::register(focus.clone())?;
        Ok(Self {
            audio,
            focus,
            subscription,
        })
    }

    /// Apply the focus policy for `active_path`. Returns how many sessions
    /// changed mute state.
    pub fn handle_focus_changed(
        &self,
        registry: &SessionRegistry,
        active_path: &str,
    ) -> Result<usize, MixerError> {
        let mut changed = 0;

        for record in self.audio.list_sessions()? {
            if !registry.is_background_muted(&record.app_path) || registry.is_locked(record.pid())
            {
                continue;
            }

            let should_mute = record.app_path != active_path;
            if record.muted != should_mute {
                self.audio.set_muted(&record.id, should_mute)?;
                changed += 1;
            }
        }

        if changed > 0 {
            tracing::debug!(active_path, changed, "applied background mute");
        }
        Ok(changed)
    }

    /// Toggle background mute for the application owning `pid`, then apply
    /// the policy against the current foreground window. Returns whether the
    /// application is registered afterwards.
    pub fn toggle_unfocused_session(
        &self,
        registry: &mut SessionRegistry,
        pid: u32,
    ) -> Result<bool, MixerError> {
        let record = session_by_pid(self.audio.as_ref(), pid)?;
        let active = self.focus.active_window()?;

        let enabled = registry.toggle_background_mute(&record.app_path);
        if let Err(e) = self.handle_focus_changed(registry, &active) {
            registry.toggle_background_mute(&record.app_path);
            tracing::warn!(pid, app_path = %record.app_path, "background mute not applied: {e}");
            return Err(e);
        }

        tracing::info!(pid, app_path = %record.app_path, enabled, "toggled background mute");
        Ok(enabled)
    }

    /// Process focus changes queued since the last call.
    pub fn drain_pending_focus_events(
        &mut self,
        registry: &SessionRegistry,
    ) -> Result<usize, MixerError> {
        let mut processed = 0;
        while let Some(active) = self.subscription.try_next() {
            self.handle_focus_changed(registry, &active)?;
            processed += 1;
        }
        Ok(processed)
    }

    pub fn take_focus_events(&mut self) -> Option<FocusReceiver> {
        self.subscription.take_events()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn release(&mut self) {
        self.subscription.release();
    }
}
