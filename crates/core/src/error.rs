use crate::gateway::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum MixerError {
    #[error("Volume must be between 0 and 1, got {0}")]
    InvalidVolume(f32),

    #[error("Could not find session with PID {0}")]
    SessionNotFound(u32),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl MixerError {
    /// True for failures caused by a process exiting between lookup and use.
    pub fn is_stale_session(&self) -> bool {
        matches!(
            self,
            MixerError::SessionNotFound(_) | MixerError::Gateway(GatewayError::SessionGone(_))
        )
    }
}
