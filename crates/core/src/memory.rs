//! In-memory audio and focus gateway.
//!
//! Behaves like a platform mixer that never changes on its own: sessions,
//! the master device and the foreground window only change through the
//! gateway traits or the setters below. Used by the tests and the demo host.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::gateway::{
    AudioDeviceGateway, FocusSender, GatewayError, SubscriptionId, WindowFocusGateway,
};
use crate::session::{MasterState, SessionRecord};

/// Build a session id in the shape Windows audio sessions use, with `pid` in
/// the third `%`-separated field.
pub fn session_id(pid: u32, app_path: &str) -> String {
    format!(
        "{{0.0.0.00000000}}.{{d4f6b0b1-2c1c-4a43-8f32-56f0a1b2c3d4}}|{app_path}%b{{00000000-0000-0000-0000-000000000000}}|1%b{pid}"
    )
}

fn system_session_id() -> String {
    "{0.0.0.00000000}.{d4f6b0b1-2c1c-4a43-8f32-56f0a1b2c3d4}|#%b{00000000-0000-0000-0000-000000000000}|1%b#".to_string()
}

#[derive(Default)]
struct Inner {
    sessions: Vec<SessionRecord>,
    master: MasterState,
    active_window: String,
    subscribers: HashMap<SubscriptionId, FocusSender>,
    next_subscription: u64,
    unavailable: bool,
}

#[derive(Default)]
pub struct InMemoryMixer {
    inner: Mutex<Inner>,
}

impl InMemoryMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, pid: u32, app_path: &str, display_name: &str, muted: bool) -> Self {
        self.add_session(pid, app_path, display_name, muted);
        self
    }

    /// Add the unnamed pid-0 session every output device reports.
    pub fn with_system_session(self, muted: bool) -> Self {
        self.push(SessionRecord {
            id: system_session_id(),
            app_path: String::new(),
            display_name: String::new(),
            volume: 1.0,
            muted,
        });
        self
    }

    pub fn with_master(self, volume: f32, muted: bool) -> Self {
        self.state().master = MasterState { volume, muted };
        self
    }

    pub fn with_active_window(self, app_path: &str) -> Self {
        self.state().active_window = app_path.to_string();
        self
    }

    pub fn add_session(&self, pid: u32, app_path: &str, display_name: &str, muted: bool) {
        self.push(SessionRecord {
            id: session_id(pid, app_path),
            app_path: app_path.to_string(),
            display_name: display_name.to_string(),
            volume: 1.0,
            muted,
        });
    }

    /// Simulate a process exiting.
    pub fn remove_session(&self, pid: u32) {
        self.state().sessions.retain(|record| record.pid() != pid);
    }

    pub fn session(&self, pid: u32) -> Option<SessionRecord> {
        self.state()
            .sessions
            .iter()
            .find(|record| record.pid() == pid)
            .cloned()
    }

    /// Change the foreground window and notify every subscriber.
    pub fn set_active_window(&self, app_path: &str) {
        let mut inner = self.state();
        inner.active_window = app_path.to_string();
        inner
            .subscribers
            .retain(|_, sender| sender.send(app_path.to_string()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.state().subscribers.len()
    }

    /// Make every gateway call fail until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    fn push(&self, record: SessionRecord) {
        self.state().sessions.push(record);
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn available(&self) -> Result<MutexGuard<'_, Inner>, GatewayError> {
        let inner = self.state();
        if inner.unavailable {
            return Err(GatewayError::DeviceUnavailable(
                "in-memory mixer offline".to_string(),
            ));
        }
        Ok(inner)
    }

    fn with_record<F>(&self, session_id: &str, update: F) -> Result<(), GatewayError>
    where
        F: FnOnce(&mut SessionRecord),
    {
        let mut inner = self.available()?;
        let record = inner
            .sessions
            .iter_mut()
            .find(|record| record.id == session_id)
            .ok_or_else(|| GatewayError::SessionGone(session_id.to_string()))?;
        update(record);
        Ok(())
    }
}

impl AudioDeviceGateway for InMemoryMixer {
    fn list_sessions(&self) -> Result<Vec<SessionRecord>, GatewayError> {
        Ok(self.available()?.sessions.clone())
    }

    fn master(&self) -> Result<MasterState, GatewayError> {
        Ok(self.available()?.master)
    }

    fn set_volume(&self, session_id: &str, volume: f32) -> Result<(), GatewayError> {
        self.with_record(session_id, |record| record.volume = volume)
    }

    fn set_muted(&self, session_id: &str, muted: bool) -> Result<(), GatewayError> {
        self.with_record(session_id, |record| record.muted = muted)
    }

    fn set_master_volume(&self, volume: f32) -> Result<(), GatewayError> {
        self.available()?.master.volume = volume;
        Ok(())
    }

    fn set_master_muted(&self, muted: bool) -> Result<(), GatewayError> {
        self.available()?.master.muted = muted;
        Ok(())
    }
}

impl WindowFocusGateway for InMemoryMixer {
    fn active_window(&self) -> Result<String, GatewayError> {
        let inner = self.state();
        if inner.unavailable {
            return Err(GatewayError::Focus("in-memory mixer offline".to_string()));
        }
        Ok(inner.active_window.clone())
    }

    fn subscribe(&self, sender: FocusSender) -> Result<SubscriptionId, GatewayError> {
        let mut inner = self.state();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.insert(id, sender);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state().subscribers.remove(&id);
    }
}
