//! Application state management.
//!
//! The AppState holds the mixer controller and is shared by the command
//! handlers, the poll loop and the focus pump.

use crate::dto::MixerEvent;
use mixer_core::MixerController;
use mixer_settings::Settings;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Shared application state.
///
/// Every command, poll cycle and focus change runs to completion while
/// holding the `mixer` lock, so they never interleave.
pub struct AppState {
    pub mixer: Mutex<MixerController>,
    pub settings: Mutex<Settings>,
    /// Where settings are persisted. `None` keeps them in memory only.
    pub settings_path: Option<PathBuf>,
    events: broadcast::Sender<MixerEvent>,
}

impl AppState {
    pub fn new(mixer: MixerController, settings: Settings, settings_path: Option<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            mixer: Mutex::new(mixer),
            settings: Mutex::new(settings),
            settings_path,
            events,
        }
    }

    /// Push an event to every subscriber. Events are dropped when nobody
    /// is listening.
    pub fn emit(&self, event: MixerEvent) {
        tracing::trace!(event = event.name(), "emit");
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MixerEvent> {
        self.events.subscribe()
    }
}
