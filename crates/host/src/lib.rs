//! Host layer for the mixer.
//!
//! This crate wires [`mixer_core::MixerController`] to the outside world:
//! command handlers and UI event dispatch, the poll loop that pushes
//! `master-update` / `session-list-update` events, and the focus pump that
//! feeds window-focus changes to the background-mute engine.

pub mod commands;
pub mod dto;
pub mod focus;
pub mod ipc;
pub mod poll;
pub mod state;

use dto::MixerEvent;
use mixer_core::{AudioDeviceGateway, MixerController, WindowFocusGateway};
use mixer_settings::Settings;
use poll::PollLoop;
use state::AppState;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A running mixer: shared state plus its background tasks.
///
/// Must be started from within a tokio runtime.
pub struct MixerHost {
    state: Arc<AppState>,
    poll: PollLoop,
    focus_pump: Option<JoinHandle<()>>,
}

impl MixerHost {
    pub fn start(
        audio: Arc<dyn AudioDeviceGateway>,
        focus: Arc<dyn WindowFocusGateway>,
        settings: Settings,
        settings_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let controller = MixerController::init(
            audio,
            focus,
            settings.background_mute_paths.iter().cloned(),
        )?;
        let interval = Duration::from_millis(settings.poll_interval_ms.max(1));

        let state = Arc::new(AppState::new(controller, settings, settings_path));
        let focus_pump = focus::spawn_focus_pump(&state);
        let poll = PollLoop::start(state.clone(), interval);

        Ok(Self {
            state,
            poll,
            focus_pump,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MixerEvent> {
        self.state.subscribe()
    }

    /// Halt the poll loop and release the focus subscription.
    pub async fn stop(mut self) {
        self.shutdown();

        if let Some(pump) = self.focus_pump.take() {
            if let Err(e) = pump.await {
                tracing::warn!("focus pump ended abnormally: {e}");
            }
        }
    }

    fn shutdown(&mut self) {
        self.poll.stop();
        self.state
            .mixer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shutdown();
    }
}

impl Drop for MixerHost {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(pump) = self.focus_pump.take() {
            pump.abort();
        }
    }
}
