//! Background polling loop for mixer updates.
//!
//! Each cycle reads the master device, emits `master-update`, then takes a
//! session snapshot and emits `session-list-update`. The next cycle is only
//! scheduled once both have been emitted, so cycles never overlap.

use crate::dto::{MixerEvent, SessionDto, SessionsResponse};
use crate::state::AppState;
use mixer_core::MixerError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Run one poll cycle against the shared state.
pub fn publish_cycle(state: &AppState) -> Result<(), MixerError> {
    let Ok(mixer) = state.mixer.lock() else {
        tracing::warn!("mixer lock poisoned; skipping poll cycle");
        return Ok(());
    };

    let master = mixer.master()?;
    state.emit(MixerEvent::MasterUpdate(master.into()));

    let response: SessionsResponse = mixer.get_sessions()?.into();
    let sessions: Vec<SessionDto> = response.sessions;
    state.emit(MixerEvent::SessionListUpdate(sessions));

    Ok(())
}

/// Handle to the running poll task.
pub struct PollLoop {
    task: Option<JoinHandle<()>>,
}

impl PollLoop {
    /// Spawn the poll task. The first cycle runs immediately.
    pub fn start(state: Arc<AppState>, interval: Duration) -> Self {
        tracing::info!(interval_ms = interval.as_millis() as u64, "starting poll loop");

        let task = tokio::spawn(async move {
            loop {
                if let Err(e) = publish_cycle(&state) {
                    tracing::warn!("poll cycle failed: {e}");
                }
                tokio::time::sleep(interval).await;
            }
        });

        Self { task: Some(task) }
    }

    /// A loop that was never started. `stop` on it is a no-op.
    pub fn idle() -> Self {
        Self { task: None }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the pending tick. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::info!("poll loop stopped");
        }
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixer_core::{InMemoryMixer, MixerController};
    use mixer_settings::Settings;
    use tokio::sync::broadcast;
    use tokio::time::timeout;

    fn test_state() -> (Arc<InMemoryMixer>, Arc<AppState>) {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Games\game.exe", "Game", false)
                .with_session(200, r"C:\Apps\chat.exe", "Chat", true)
                .with_master(0.4, true),
        );
        let controller = MixerController::init(mixer.clone(), mixer.clone(), Vec::<String>::new())
            .expect("controller");
        let state = Arc::new(AppState::new(controller, Settings::default(), None));
        (mixer, state)
    }

    async fn next(events: &mut broadcast::Receiver<MixerEvent>) -> MixerEvent {
        timeout(Duration::from_secs(60), events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event")
    }

    #[test]
    fn test_publish_cycle_emits_master_then_sessions() {
        let (_mixer, state) = test_state();
        let mut events = state.subscribe();

        publish_cycle(&state).expect("cycle");

        match events.try_recv().expect("master") {
            MixerEvent::MasterUpdate(master) => {
                assert_eq!(master.volume, 0.4);
                assert!(master.muted);
            }
            other => panic!("expected master-update, got {other:?}"),
        }
        match events.try_recv().expect("sessions") {
            MixerEvent::SessionListUpdate(sessions) => {
                assert_eq!(sessions.len(), 2);
                assert_eq!(sessions[0].name, "game");
                assert!(sessions[1].is_muted);
            }
            other => panic!("expected session-list-update, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_cycle_emits_nothing() {
        let (mixer, state) = test_state();
        let mut events = state.subscribe();
        mixer.set_unavailable(true);

        assert!(publish_cycle(&state).is_err());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_publishes_every_interval() {
        let (mixer, state) = test_state();
        let mut events = state.subscribe();
        let mut poll = PollLoop::start(state.clone(), Duration::from_millis(500));

        assert_eq!(next(&mut events).await.name(), "master-update");
        assert_eq!(next(&mut events).await.name(), "session-list-update");

        mixer.add_session(300, r"C:\Apps\music.exe", "Music", false);

        assert_eq!(next(&mut events).await.name(), "master-update");
        match next(&mut events).await {
            MixerEvent::SessionListUpdate(sessions) => assert_eq!(sessions.len(), 3),
            other => panic!("expected session-list-update, got {other:?}"),
        }

        assert!(poll.is_running());
        poll.stop();
        assert!(!poll.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_survives_gateway_failure() {
        let (mixer, state) = test_state();
        mixer.set_unavailable(true);
        let mut events = state.subscribe();
        let mut poll = PollLoop::start(state.clone(), Duration::from_millis(500));

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(events.try_recv().is_err());

        mixer.set_unavailable(false);
        assert_eq!(next(&mut events).await.name(), "master-update");
        poll.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_publishing() {
        let (_mixer, state) = test_state();
        let mut events = state.subscribe();
        let mut poll = PollLoop::start(state.clone(), Duration::from_millis(500));

        next(&mut events).await;
        next(&mut events).await;
        poll.stop();
        tokio::task::yield_now().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut poll = PollLoop::idle();
        poll.stop();
        poll.stop();
        assert!(!poll.is_running());
    }
}
