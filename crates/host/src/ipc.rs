//! Dispatch of string-named UI events.
//!
//! The frontend sends an event name plus a JSON payload. Payloads are either
//! a bare value or an array of arguments, and numbers may arrive as strings.
//! Volumes are sent as percentages.

use crate::commands::{self, CommandResult};
use crate::poll::publish_cycle;
use crate::state::AppState;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum IpcEvent {
    Init,
    VolumeModified { pid: u32, volume: f32 },
    SessionMuted { pid: u32 },
    SessionSolo { pid: u32 },
    SessionLock { pid: u32 },
    SessionBackgroundMute { pid: u32 },
    MasterVolumeModified { volume: f32 },
    MasterMuteState { muted: bool },
}

impl IpcEvent {
    /// Returns `Ok(None)` for event names this host does not handle.
    pub fn parse(event_type: &str, data: &Value) -> CommandResult<Option<Self>> {
        let event = match event_type {
            "init" => IpcEvent::Init,
            "volume-modified" => IpcEvent::VolumeModified {
                pid: pid_arg(data, 0)?,
                volume: percent_arg(data, 1)?,
            },
            "session-muted" => IpcEvent::SessionMuted {
                pid: pid_arg(data, 0)?,
            },
            "session-solo" => IpcEvent::SessionSolo {
                pid: pid_arg(data, 0)?,
            },
            "session-lock" => IpcEvent::SessionLock {
                pid: pid_arg(data, 0)?,
            },
            "session-background-mute" => IpcEvent::SessionBackgroundMute {
                pid: pid_arg(data, 0)?,
            },
            "master-volume-modified" => IpcEvent::MasterVolumeModified {
                volume: percent_arg(data, 0)?,
            },
            "session-mute-state" => IpcEvent::MasterMuteState {
                muted: bool_arg(data, 0)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// Parse and run one UI event.
pub fn dispatch(state: &AppState, event_type: &str, data: &Value) -> CommandResult<()> {
    let Some(event) = IpcEvent::parse(event_type, data)? else {
        tracing::debug!(event_type, "ignoring unknown ipc event");
        return Ok(());
    };
    tracing::debug!(?event, "ipc event");

    match event {
        IpcEvent::Init => {
            publish_cycle(state).map_err(|e| e.to_string())?;
            commands::refresh_settings(state)?;
        }
        IpcEvent::VolumeModified { pid, volume } => {
            commands::set_session_volume(pid, volume, state)?;
        }
        IpcEvent::SessionMuted { pid } => {
            commands::toggle_session_mute(pid, state)?;
        }
        IpcEvent::SessionSolo { pid } => {
            commands::toggle_solo(pid, state)?;
        }
        IpcEvent::SessionLock { pid } => {
            commands::toggle_session_lock(pid, state)?;
        }
        IpcEvent::SessionBackgroundMute { pid } => {
            commands::toggle_background_mute_for_session(pid, state)?;
        }
        IpcEvent::MasterVolumeModified { volume } => {
            commands::set_master_volume(volume, state)?;
        }
        IpcEvent::MasterMuteState { muted } => {
            commands::set_master_mute(muted, state)?;
        }
    }
    Ok(())
}

fn arg(data: &Value, index: usize) -> Option<&Value> {
    match data {
        Value::Array(items) => items.get(index),
        other if index == 0 => Some(other),
        _ => None,
    }
}

fn number_arg(data: &Value, index: usize) -> CommandResult<f64> {
    let number = match arg(data, index) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    number.ok_or_else(|| format!("Expected a number for argument {index}, got {data}"))
}

fn pid_arg(data: &Value, index: usize) -> CommandResult<u32> {
    let value = number_arg(data, index)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(format!("Invalid PID: {value}"));
    }
    Ok(value as u32)
}

fn percent_arg(data: &Value, index: usize) -> CommandResult<f32> {
    Ok((number_arg(data, index)? / 100.0) as f32)
}

fn bool_arg(data: &Value, index: usize) -> CommandResult<bool> {
    match arg(data, index) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
        _ => Err(format!("Expected a boolean for argument {index}, got {data}")),
    }
}
