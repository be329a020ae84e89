//! Transport layer
//!
//! Owns the byte-level link to the conveyor firmware: connection
//! parameters, the port abstraction, and the exclusive connection handle.
//! Writes are fire-and-forget; nothing is queued or read back.

pub mod serial;

use conveyorjog_core::{Command, ConnectionError, Result, UserInputError, WriteError};
use serde::{Deserialize, Serialize};
use std::io;

pub use serial::SerialPortInfo;

/// Baud rate of the jog protocol
pub const JOG_BAUD_RATE: u32 = 115_200;

/// Upper bound on a single blocking port operation
pub const DEFAULT_TIMEOUT_MS: u64 = 20;

/// Parameters for opening a serial connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Device identifier (e.g. "COM7", "/dev/ttyACM0")
    pub port: String,
    /// Line speed, always [`JOG_BAUD_RATE`] for this protocol
    pub baud_rate: u32,
    /// Port I/O timeout in milliseconds
    pub timeout_ms: u64,
}

impl ConnectionParams {
    /// Parameters for `port` at the protocol's fixed baud rate
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into().trim().to_string(),
            baud_rate: JOG_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Override the I/O timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Check the parameters before any device is touched
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(UserInputError::NoPortSelected.into());
        }
        if self.baud_rate != JOG_BAUD_RATE {
            return Err(ConnectionError::UnsupportedBaudRate {
                baud: self.baud_rate,
            }
            .into());
        }
        Ok(())
    }
}

/// Low-level serial port interface
pub trait SerialPort: Send {
    /// Write data to the port
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Close the port
    fn close(&mut self) -> io::Result<()>;
}

/// Source of serial ports: enumeration and opening
pub trait PortDriver: Send {
    /// Ports currently reported by the OS
    fn available_ports(&self) -> Result<Vec<SerialPortInfo>>;

    /// Open a port with the given parameters
    fn open(&self, params: &ConnectionParams) -> Result<Box<dyn SerialPort>>;
}

/// The single live serial session
///
/// Owns the device exclusively. Dropping the handle closes it.
pub struct ConnectionHandle {
    port_name: String,
    timeout_ms: u64,
    port: Option<Box<dyn SerialPort>>,
}

impl ConnectionHandle {
    /// Validate `params` and open the device through `driver`
    pub fn open(driver: &dyn PortDriver, params: &ConnectionParams) -> Result<Self> {
        params.validate()?;
        let port = driver.open(params)?;
        tracing::info!("Opened {} at {} baud", params.port, params.baud_rate);

        Ok(Self {
            port_name: params.port.clone(),
            timeout_ms: params.timeout_ms,
            port: Some(port),
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Close the device. Safe to call any number of times.
    pub fn close(&mut self) {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.close() {
                tracing::warn!("Error while closing {}: {}", self.port_name, e);
            }
            tracing::info!("Closed {}", self.port_name);
        }
    }

    /// Write one command as exactly two bytes
    ///
    /// Short writes are reported, never retried.
    pub fn write_command(&mut self, command: Command) -> std::result::Result<(), WriteError> {
        let port = self.port.as_mut().ok_or(WriteError::NotOpen)?;
        let bytes = command.as_bytes();

        match port.write(&bytes) {
            Ok(written) if written == bytes.len() => {
                tracing::debug!("{} <- {}", self.port_name, command);
                Ok(())
            }
            Ok(written) => Err(WriteError::ShortWrite {
                written,
                expected: bytes.len(),
            }),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Err(WriteError::TimedOut {
                timeout_ms: self.timeout_ms,
            }),
            Err(e) => Err(WriteError::Io {
                reason: e.to_string(),
            }),
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("port_name", &self.port_name)
            .field("open", &self.is_open())
            .finish()
    }
}
