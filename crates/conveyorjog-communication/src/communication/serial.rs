//! Serial port communication implementation
//!
//! Provides the OS-backed port driver used in production:
//! - Port enumeration and discovery
//! - Opening at 115200 baud, 8N1, no flow control
//! - Short-timeout writes so a stalled device cannot freeze the console

use crate::communication::{ConnectionParams, PortDriver, SerialPort};
use conveyorjog_core::{ConnectionError, Result};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Duration;

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// Serial number if available
    pub serial_number: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set serial number
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List serial ports reported by the OS
///
/// With `usb_only`, keeps only names that look like a microcontroller
/// board (see [`is_usb_serial_port`]). Order is whatever the OS reports.
pub fn list_ports(usb_only: bool) -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        ConnectionError::Enumeration {
            reason: e.to_string(),
        }
    })?;

    Ok(ports
        .iter()
        .filter(|port| !usb_only || is_usb_serial_port(&port.port_name))
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, get_port_description(port));

            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb_info) => {
                    let mut info = info.with_usb_ids(usb_info.vid, usb_info.pid);
                    if let Some(ref mfg) = usb_info.manufacturer {
                        info = info.with_manufacturer(mfg);
                    }
                    if let Some(ref serial) = usb_info.serial_number {
                        info = info.with_serial_number(serial);
                    }
                    info
                }
                _ => info,
            }
        })
        .collect())
}

/// Check if a port name matches a USB/board serial pattern
///
/// Valid patterns:
/// - Windows: COM* (COM1, COM2, etc.)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn is_usb_serial_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    port_name.starts_with("/dev/ttyUSB")
        || port_name.starts_with("/dev/ttyACM")
        || port_name.starts_with("/dev/cu.usbserial-")
        || port_name.starts_with("/dev/cu.usbmodem")
}

/// Get a user-friendly description for a port
fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Translate an open failure into the connection error the operator sees
///
/// The OS message is kept as the reason so hints such as a missing
/// group membership reach the status line.
fn map_open_error(port: &str, e: serialport::Error) -> ConnectionError {
    let port = port.to_string();
    let busy = {
        let text = e.description.to_ascii_lowercase();
        text.contains("busy") || text.contains("in use")
    };
    let reason = e.description;

    match e.kind {
        serialport::ErrorKind::NoDevice | serialport::ErrorKind::Io(io::ErrorKind::NotFound) => {
            ConnectionError::PortNotFound { port, reason }
        }
        serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied) => {
            ConnectionError::PermissionDenied { port, reason }
        }
        serialport::ErrorKind::Io(io::ErrorKind::AddrInUse) => {
            ConnectionError::PortInUse { port, reason }
        }
        _ if busy => ConnectionError::PortInUse { port, reason },
        _ => ConnectionError::FailedToOpen { port, reason },
    }
}

/// Real serial port implementation using serialport crate
pub struct RealSerialPort {
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl RealSerialPort {
    /// Open a serial port with the given parameters
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        let builder = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(params.timeout_ms))
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None);

        match builder.open() {
            Ok(port) => Ok(RealSerialPort { port: Some(port) }),
            Err(e) => {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                Err(map_open_error(&params.port, e).into())
            }
        }
    }
}

impl SerialPort for RealSerialPort {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self.port.as_mut() {
            Some(port) => port.write(data),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "port closed")),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        // serialport releases the device on drop
        self.port = None;
        Ok(())
    }
}

/// Port driver backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPortDriver {
    usb_only: bool,
}

impl SystemPortDriver {
    pub fn new(usb_only: bool) -> Self {
        Self { usb_only }
    }
}

impl PortDriver for SystemPortDriver {
    fn available_ports(&self) -> Result<Vec<SerialPortInfo>> {
        list_ports(self.usb_only)
    }

    fn open(&self, params: &ConnectionParams) -> Result<Box<dyn SerialPort>> {
        Ok(Box::new(RealSerialPort::open(params)?))
    }
}
