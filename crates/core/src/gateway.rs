//! Boundaries to the platform audio mixer and window manager.
//!
//! Both gateways are synchronous: every call is expected to return quickly
//! enough to run inline with a command or poll cycle.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::session::{MasterState, SessionRecord};

/// Sending half handed to the focus gateway; carries the newly active
/// application path.
pub type FocusSender = mpsc::UnboundedSender<String>;
pub type FocusReceiver = mpsc::UnboundedReceiver<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Session '{0}' no longer exists")]
    SessionGone(String),

    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Window focus query failed: {0}")]
    Focus(String),
}

pub trait AudioDeviceGateway: Send + Sync {
    fn list_sessions(&self) -> Result<Vec<SessionRecord>, GatewayError>;

    fn master(&self) -> Result<MasterState, GatewayError>;

    /// Fails with [`GatewayError::SessionGone`] if the session has exited.
    fn set_volume(&self, session_id: &str, volume: f32) -> Result<(), GatewayError>;

    /// Fails with [`GatewayError::SessionGone`] if the session has exited.
    fn set_muted(&self, session_id: &str, muted: bool) -> Result<(), GatewayError>;

    fn set_master_volume(&self, volume: f32) -> Result<(), GatewayError>;

    fn set_master_muted(&self, muted: bool) -> Result<(), GatewayError>;
}

pub trait WindowFocusGateway: Send + Sync {
    /// Application path of the currently focused window.
    fn active_window(&self) -> Result<String, GatewayError>;

    fn subscribe(&self, sender: FocusSender) -> Result<SubscriptionId, GatewayError>;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Owned registration for focus-change notifications.
///
/// The registration is released by [`FocusSubscription::release`] or on drop,
/// after which the gateway no longer holds the sender.
pub struct FocusSubscription {
    gateway: Arc<dyn WindowFocusGateway>,
    id: Option<SubscriptionId>,
    events: Option<FocusReceiver>,
}

impl FocusSubscription {
    pub fn register(gateway: Arc<dyn WindowFocusGateway>) -> Result<Self, GatewayError> {
        let (sender, events) = mpsc::unbounded_channel();
        let id = gateway.subscribe(sender)?;
        tracing::debug!(subscription = id.0, "focus subscription registered");

        Ok(Self {
            gateway,
            id: Some(id),
            events: Some(events),
        })
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Hand the receiving half to an async consumer. Later calls return `None`.
    pub fn take_events(&mut self) -> Option<FocusReceiver> {
        self.events.take()
    }

    /// Next queued focus change, if the receiver has not been taken.
    pub fn try_next(&mut self) -> Option<String> {
        self.events.as_mut()?.try_recv().ok()
    }

    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.gateway.unsubscribe(id);
            self.events = None;
            tracing::debug!(subscription = id.0, "focus subscription released");
        }
    }
}

impl Drop for FocusSubscription {
    fn drop(&mut self) {
        self.release();
    }
}
