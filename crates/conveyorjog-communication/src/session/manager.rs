//! Session manager
//!
//! Gatekeeper for the one serial connection and the commands sent on it.
//! Every failure is turned into an error status here; the caller also
//! gets the typed error back but nothing is fatal.

use super::listener::{StatusListener, StatusListenerHandle};
use crate::communication::{
    ConnectionHandle, ConnectionParams, PortDriver, SerialPortInfo, DEFAULT_TIMEOUT_MS,
};
use conveyorjog_core::{Command, Error, Result, SessionStatus, UserInputError};
use std::collections::HashMap;
use std::sync::Arc;

/// What happened to a dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The command was written to `port`
    Sent { port: String, command: Command },
    /// No connection is open; nothing was written
    NotConnected,
}

/// Owner of the connection lifecycle
pub struct SessionManager {
    driver: Box<dyn PortDriver>,
    /// At most one live connection
    handle: Option<ConnectionHandle>,
    timeout_ms: u64,
    selected_port: Option<String>,
    status: SessionStatus,
    listeners: HashMap<String, Arc<dyn StatusListener>>,
}

impl SessionManager {
    /// Create a disconnected session using `driver` for all port access
    pub fn new(driver: Box<dyn PortDriver>) -> Self {
        Self {
            driver,
            handle: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            selected_port: None,
            status: SessionStatus::Disconnected,
            listeners: HashMap::new(),
        }
    }

    /// Set the port I/O timeout used for future connections
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Names of the ports the OS currently reports
    ///
    /// Enumeration failures are logged and yield an empty list.
    pub fn list_available_ports(&self) -> Vec<String> {
        self.port_details()
            .into_iter()
            .map(|info| info.port_name)
            .collect()
    }

    /// Full port descriptions, empty when enumeration fails
    pub fn port_details(&self) -> Vec<SerialPortInfo> {
        match self.driver.available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                tracing::warn!("Port enumeration failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Re-enumerate and reset the selection
    ///
    /// Selects `preferred` when it is among the listed ports, otherwise the
    /// first listed port, otherwise nothing. Returns the listing the
    /// selection was made from.
    pub fn refresh_ports(&mut self, preferred: Option<&str>) -> Vec<SerialPortInfo> {
        let ports = self.port_details();
        let preferred = preferred.map(str::trim).filter(|p| !p.is_empty());

        self.selected_port = preferred
            .and_then(|p| ports.iter().find(|info| info.port_name == p))
            .or_else(|| ports.first())
            .map(|info| info.port_name.clone());

        tracing::debug!(
            "Found {} port(s), selected {:?}",
            ports.len(),
            self.selected_port
        );
        ports
    }

    /// Choose the port used by [`connect_selected`](Self::connect_selected)
    pub fn select_port(&mut self, port: impl Into<String>) {
        let port = port.into().trim().to_string();
        self.selected_port = (!port.is_empty()).then_some(port);
    }

    pub fn selected_port(&self) -> Option<&str> {
        self.selected_port.as_deref()
    }

    /// Open `device_id`, closing any connection that is already open
    ///
    /// A blank `device_id` is rejected before anything is closed or opened.
    pub fn connect(&mut self, device_id: &str) -> Result<SessionStatus> {
        let params = ConnectionParams::new(device_id).with_timeout_ms(self.timeout_ms);
        if let Err(e) = params.validate() {
            return Err(self.fail_connect(e));
        }

        self.close_handle();

        match ConnectionHandle::open(self.driver.as_ref(), &params) {
            Ok(handle) => {
                let port = handle.port_name().to_string();
                self.handle = Some(handle);
                self.set_status(SessionStatus::Connected { port });
                Ok(self.status.clone())
            }
            Err(e) => Err(self.fail_connect(e)),
        }
    }

    /// Connect to the selected port
    pub fn connect_selected(&mut self) -> Result<SessionStatus> {
        match self.selected_port.clone() {
            Some(port) => self.connect(&port),
            None => Err(self.fail_connect(UserInputError::NoPortSelected.into())),
        }
    }

    /// Close the connection, if any, and report disconnected
    pub fn disconnect(&mut self) {
        self.close_handle();
        self.set_status(SessionStatus::Disconnected);
    }

    /// Send one command over the open connection
    ///
    /// Without a connection nothing is written and the result is
    /// [`Dispatch::NotConnected`]. A write failure leaves the connection
    /// open; the operator decides whether to reconnect.
    pub fn dispatch(&mut self, command: Command) -> Result<Dispatch> {
        let Some(handle) = self.handle.as_mut() else {
            tracing::debug!("Dropping {}: not connected", command);
            self.set_status(SessionStatus::Disconnected);
            return Ok(Dispatch::NotConnected);
        };

        let port = handle.port_name().to_string();
        match handle.write_command(command) {
            Ok(()) => {
                self.set_status(SessionStatus::sent(port.clone(), command));
                Ok(Dispatch::Sent { port, command })
            }
            Err(e) => {
                tracing::warn!("Failed to send {} to {}: {}", command, port, e);
                self.set_status(SessionStatus::write_failed(&e));
                Err(e.into())
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handle.as_ref().is_some_and(ConnectionHandle::is_open)
    }

    /// Name of the connected port
    pub fn connected_port(&self) -> Option<&str> {
        self.handle.as_ref().map(ConnectionHandle::port_name)
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Register a status listener
    pub fn add_listener(&mut self, listener: Arc<dyn StatusListener>) -> StatusListenerHandle {
        let handle = StatusListenerHandle::generate();
        self.listeners.insert(handle.0.clone(), listener);
        handle
    }

    /// Unregister a status listener, returning whether it was registered
    pub fn remove_listener(&mut self, handle: &StatusListenerHandle) -> bool {
        self.listeners.remove(&handle.0).is_some()
    }

    fn close_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }

    fn fail_connect(&mut self, error: Error) -> Error {
        tracing::warn!("Connect failed: {}", error);
        self.set_status(SessionStatus::connect_failed(&error));
        error
    }

    fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        for listener in self.listeners.values() {
            listener.on_status_changed(&self.status);
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("handle", &self.handle)
            .field("timeout_ms", &self.timeout_ms)
            .field("selected_port", &self.selected_port)
            .field("status", &self.status)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
