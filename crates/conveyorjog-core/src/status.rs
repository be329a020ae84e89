//! Session status shown to the operator
//!
//! Purely observational. Nothing in the session makes decisions based on
//! the current status value.

use crate::jog::Command;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-facing connection/command status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SessionStatus {
    /// No connection is open
    #[default]
    Disconnected,
    /// A connection to `port` was just opened
    Connected { port: String },
    /// `command` was written to `port` at `at`
    Sent {
        port: String,
        command: Command,
        at: DateTime<Local>,
    },
    /// The last operation failed
    Error { message: String },
}

impl SessionStatus {
    /// Status for a failed connect attempt
    pub fn connect_failed(err: impl fmt::Display) -> Self {
        SessionStatus::Error {
            message: format!("Connect error: {}", err),
        }
    }

    /// Status for a failed command write
    pub fn write_failed(err: impl fmt::Display) -> Self {
        SessionStatus::Error {
            message: format!("Serial error: {}", err),
        }
    }

    /// Status for a command just written
    pub fn sent(port: impl Into<String>, command: Command) -> Self {
        SessionStatus::Sent {
            port: port.into(),
            command,
            at: Local::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SessionStatus::Error { .. })
    }

    /// Last command written, if that is what this status reports
    pub fn last_command(&self) -> Option<Command> {
        match self {
            SessionStatus::Sent { command, .. } => Some(*command),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Disconnected => write!(f, "Not connected"),
            SessionStatus::Connected { port } => write!(f, "Connected: {}", port),
            SessionStatus::Sent { port, command, .. } => write!(f, "{}  sent: {}", port, command),
            SessionStatus::Error { message } => f.write_str(message),
        }
    }
}
