//! Error handling for ConveyorJog
//!
//! Provides error types for every layer of the jog console:
//! - Connection errors (opening and enumerating serial devices)
//! - Write errors (delivering commands on an open device)
//! - User input errors (operator mistakes caught before any I/O)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Represents failures to open or discover a serial device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Port not found
    #[error("Port not found: {port}: {reason}")]
    PortNotFound {
        /// The name of the port that was not found.
        port: String,
        /// OS message for the failure.
        reason: String,
    },

    /// Port is already in use
    #[error("Port already in use: {port}: {reason}")]
    PortInUse {
        /// The name of the port that is in use.
        port: String,
        /// OS message for the failure.
        reason: String,
    },

    /// Access to the port was denied by the OS
    #[error("Permission denied: {port}: {reason}")]
    PermissionDenied {
        /// The name of the port that could not be accessed.
        port: String,
        /// OS message for the failure.
        reason: String,
    },

    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// Baud rate not supported
    #[error("Baud rate {baud} not supported")]
    UnsupportedBaudRate {
        /// The unsupported baud rate.
        baud: u32,
    },

    /// Port enumeration failed
    #[error("Failed to enumerate ports: {reason}")]
    Enumeration {
        /// The reason enumeration failed.
        reason: String,
    },
}

/// Write error type
///
/// Represents failures while delivering a command over an open connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The handle has already been closed
    #[error("Port is not open")]
    NotOpen,

    /// Fewer bytes were accepted than the command holds
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes accepted by the device.
        written: usize,
        /// Bytes in the command.
        expected: usize,
    },

    /// The device did not accept the bytes in time
    #[error("Write timed out after {timeout_ms}ms")]
    TimedOut {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// OS-level I/O failure
    #[error("I/O error: {reason}")]
    Io {
        /// The reason for the I/O error.
        reason: String,
    },
}

/// Operator mistakes detected before any device is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserInputError {
    /// No port was chosen before connecting
    #[error("No port selected: refresh the port list and choose one")]
    NoPortSelected,

    /// A key name with no jog binding
    #[error("Key '{key}' is not bound to a jog direction")]
    UnknownKey {
        /// The key name as typed.
        key: String,
    },
}

/// Main error type for ConveyorJog
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Write error
    #[error(transparent)]
    Write(#[from] WriteError),

    /// User input error
    #[error(transparent)]
    UserInput(#[from] UserInputError),

    /// Configuration error
    #[error("Config error: {reason}")]
    Config {
        /// The reason the configuration was rejected.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a write error
    pub fn is_write_error(&self) -> bool {
        matches!(self, Error::Write(_))
    }

    /// Check if this is a user input error
    pub fn is_user_input_error(&self) -> bool {
        matches!(self, Error::UserInput(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
