use std::sync::Arc;

use crate::error::MixerError;
use crate::gateway::AudioDeviceGateway;
use crate::registry::SessionRegistry;
use crate::session::SessionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoloOutcome {
    /// Every other unlocked session was muted.
    Applied,
    /// Solo was already in effect; the other sessions were unmuted.
    Reverted,
    /// Everything was muted; only the target came back.
    TargetUnmuted,
}

/// Computes and applies solo cascades.
pub struct SoloEngine {
    audio: Arc<dyn AudioDeviceGateway>,
}

impl SoloEngine {
    pub fn new(audio: Arc<dyn AudioDeviceGateway>) -> Self {
        Self { audio }
    }

    pub fn toggle_solo(
        &self,
        registry: &SessionRegistry,
        pid: u32,
    ) -> Result<SoloOutcome, MixerError> {
        let mut targets: Vec<SessionRecord> = Vec::new();
        let mut others: Vec<SessionRecord> = Vec::new();

        for record in self.audio.list_sessions()? {
            let record_pid = record.pid();
            if record_pid == pid {
                targets.push(record);
            } else if !registry.is_locked(record_pid) {
                others.push(record);
            }
        }

        if targets.is_empty() {
            return Err(MixerError::SessionNotFound(pid));
        }

        let all_others_muted = others.iter().all(|record| record.muted);

        let outcome = if all_others_muted {
            if targets.iter().any(|record| !record.muted) {
                for record in &others {
                    self.audio.set_muted(&record.id, false)?;
                }
                SoloOutcome::Reverted
            } else {
                if !registry.is_locked(pid) {
                    for record in &targets {
                        self.audio.set_muted(&record.id, false)?;
                    }
                }
                SoloOutcome::TargetUnmuted
            }
        } else {
            // The target keeps whatever mute state it had.
            for record in others.iter().filter(|record| !record.muted) {
                self.audio.set_muted(&record.id, true)?;
            }
            SoloOutcome::Applied
        };

        tracing::info!(pid, ?outcome, "toggled solo");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMixer;

    fn engine(mixer: &Arc<InMemoryMixer>) -> SoloEngine {
        SoloEngine::new(mixer.clone())
    }

    fn muted(mixer: &InMemoryMixer, pid: u32) -> bool {
        mixer.session(pid).expect("session").muted
    }

    #[test]
    fn test_solo_is_an_involution_for_two_sessions() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Apps\a.exe", "A", false)
                .with_session(200, r"C:\Apps\b.exe", "B", false),
        );
        let registry = SessionRegistry::new();
        let solo = engine(&mixer);

        assert_eq!(solo.toggle_solo(&registry, 100).unwrap(), SoloOutcome::Applied);
        assert!(!muted(&mixer, 100));
        assert!(muted(&mixer, 200));

        assert_eq!(solo.toggle_solo(&registry, 100).unwrap(), SoloOutcome::Reverted);
        assert!(!muted(&mixer, 100));
        assert!(!muted(&mixer, 200));
    }

    #[test]
    fn test_apply_does_not_unmute_target() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Apps\a.exe", "A", true)
                .with_session(200, r"C:\Apps\b.exe", "B", false),
        );
        let registry = SessionRegistry::new();

        assert_eq!(
            engine(&mixer).toggle_solo(&registry, 100).unwrap(),
            SoloOutcome::Applied
        );
        assert!(muted(&mixer, 100));
        assert!(muted(&mixer, 200));
    }

    #[test]
    fn test_everything_muted_unmutes_only_target() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Apps\a.exe", "A", true)
                .with_session(200, r"C:\Apps\b.exe", "B", true)
                .with_session(300, r"C:\Apps\c.exe", "C", true),
        );
        let registry = SessionRegistry::new();

        assert_eq!(
            engine(&mixer).toggle_solo(&registry, 200).unwrap(),
            SoloOutcome::TargetUnmuted
        );
        assert!(muted(&mixer, 100));
        assert!(!muted(&mixer, 200));
        assert!(muted(&mixer, 300));
    }

    #[test]
    fn test_locked_session_is_excluded_from_cascade() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Apps\a.exe", "A", false)
                .with_session(200, r"C:\Apps\b.exe", "B", false)
                .with_session(300, r"C:\Apps\c.exe", "C", false),
        );
        let mut registry = SessionRegistry::new();
        registry.toggle_lock(200, false);
        let solo = engine(&mixer);

        solo.toggle_solo(&registry, 100).unwrap();
        assert!(!muted(&mixer, 100));
        assert!(!muted(&mixer, 200));
        assert!(muted(&mixer, 300));

        // The locked, unmuted session does not block the revert.
        assert_eq!(solo.toggle_solo(&registry, 100).unwrap(), SoloOutcome::Reverted);
        assert!(!muted(&mixer, 200));
        assert!(!muted(&mixer, 300));
    }

    #[test]
    fn test_locked_muted_session_stays_muted_on_revert() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Apps\a.exe", "A", false)
                .with_session(200, r"C:\Apps\b.exe", "B", true)
                .with_session(300, r"C:\Apps\c.exe", "C", true),
        );
        let mut registry = SessionRegistry::new();
        registry.toggle_lock(200, true);

        assert_eq!(
            engine(&mixer).toggle_solo(&registry, 100).unwrap(),
            SoloOutcome::Reverted
        );
        assert!(muted(&mixer, 200));
        assert!(!muted(&mixer, 300));
    }

    #[test]
    fn test_locked_target_is_not_unmuted() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Apps\a.exe", "A", true)
                .with_session(200, r"C:\Apps\b.exe", "B", true),
        );
        let mut registry = SessionRegistry::new();
        registry.toggle_lock(100, true);

        assert_eq!(
            engine(&mixer).toggle_solo(&registry, 100).unwrap(),
            SoloOutcome::TargetUnmuted
        );
        assert!(muted(&mixer, 100));
    }

    #[test]
    fn test_stale_lock_is_tolerated() {
        let mixer = Arc::new(
            InMemoryMixer::new()
                .with_session(100, r"C:\Apps\a.exe", "A", false)
                .with_session(200, r"C:\Apps\b.exe", "B", false),
        );
        let mut registry = SessionRegistry::new();
        registry.toggle_lock(999, false);

        engine(&mixer).toggle_solo(&registry, 100).unwrap();
        assert!(muted(&mixer, 200));
    }

    #[test]
    fn test_unknown_pid_is_not_found() {
        let mixer = Arc::new(InMemoryMixer::new().with_session(100, r"C:\Apps\a.exe", "A", false));
        let registry = SessionRegistry::new();

        assert!(matches!(
            engine(&mixer).toggle_solo(&registry, 4242),
            Err(MixerError::SessionNotFound(4242))
        ));
        assert!(!muted(&mixer, 100));
    }
}
