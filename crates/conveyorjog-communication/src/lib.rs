//! # ConveyorJog Communication
//!
//! Serial transport and jog session management for ConveyorJog.
//! The transport owns the byte-level link at 115200 baud; the session
//! layer owns the connection lifecycle and turns input edges into
//! two-byte jog commands on the wire.

pub mod communication;
pub mod session;

pub use communication::{
    serial::{is_usb_serial_port, list_ports, RealSerialPort, SerialPortInfo, SystemPortDriver},
    ConnectionHandle, ConnectionParams, PortDriver, SerialPort, DEFAULT_TIMEOUT_MS,
    JOG_BAUD_RATE,
};

pub use session::{
    Dispatch, JogOutcome, JogSession, SessionManager, StatusListener, StatusListenerHandle,
};
