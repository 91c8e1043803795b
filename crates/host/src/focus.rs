//! Forwards focus-change notifications into the mixer.

use crate::state::AppState;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;

/// Take the focus receiver from the controller and apply each change as it
/// arrives. The task ends once the controller releases its subscription or
/// the state is dropped.
///
/// Returns `None` if the receiver was already taken.
pub fn spawn_focus_pump(state: &Arc<AppState>) -> Option<JoinHandle<()>> {
    let mut events = state.mixer.lock().ok()?.take_focus_events()?;
    let state: Weak<AppState> = Arc::downgrade(state);

    Some(tokio::spawn(async move {
        while let Some(active_path) = events.recv().await {
            let Some(state) = state.upgrade() else {
                break;
            };
            let Ok(mixer) = state.mixer.lock() else {
                tracing::warn!("mixer lock poisoned; stopping focus pump");
                break;
            };
            match mixer.handle_focus_changed(&active_path) {
                Ok(changed) => {
                    tracing::debug!(active_path = %active_path, changed, "focus changed")
                }
                Err(e) => tracing::warn!(active_path = %active_path, "focus change failed: {e}"),
            }
        }
        tracing::debug!("focus pump finished");
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixer_core::{InMemoryMixer, MixerController};
    use mixer_settings::Settings;
    use std::time::Duration;

    const GAME: &str = r"C:\Games\game.exe";
    const CHAT: &str = r"C:\Apps\chat.exe";

    #[tokio::test]
    async fn test_focus_pump_applies_changes_until_shutdown() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, GAME, "Game", false)
                .with_session(200, CHAT, "Chat", false)
                .with_active_window(CHAT),
        );
        let controller =
            MixerController::init(mixer.clone(), mixer.clone(), [GAME]).expect("controller");
        let state = Arc::new(AppState::new(controller, Settings::default(), None));

        let pump = spawn_focus_pump(&state).expect("pump");
        assert!(spawn_focus_pump(&state).is_none());

        mixer.set_active_window(CHAT);
        for _ in 0..100 {
            if mixer.session(100).expect("game").muted {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(mixer.session(100).expect("game").muted);

        state.mixer.lock().expect("lock").shutdown();
        tokio::time::timeout(Duration::from_secs(5), pump)
            .await
            .expect("pump should finish after shutdown")
            .expect("join");
    }

    #[tokio::test]
    async fn test_focus_pump_does_not_keep_state_alive() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, GAME, "Game", false)
                .with_active_window(GAME),
        );
        let controller =
            MixerController::init(mixer.clone(), mixer.clone(), [GAME]).expect("controller");
        let state = Arc::new(AppState::new(controller, Settings::default(), None));

        let pump = spawn_focus_pump(&state).expect("pump");
        assert_eq!(Arc::strong_count(&state), 1);

        drop(state);
        assert_eq!(mixer.subscriber_count(), 0);
        tokio::time::timeout(Duration::from_secs(5), pump)
            .await
            .expect("pump should finish once the state is gone")
            .expect("join");
    }
}
