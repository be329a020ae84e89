//! Recording port driver shared by the integration tests

#![allow(dead_code)]

use conveyorjog_communication::{ConnectionParams, PortDriver, SerialPort, SerialPortInfo};
use conveyorjog_core::{ConnectionError, Result};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// How the mock device answers writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteBehavior {
    #[default]
    Accept,
    Short,
    Fail(io::ErrorKind),
}

/// Everything the mock driver observed
#[derive(Debug, Default)]
pub struct WireLog {
    pub enumerations: usize,
    pub opened: Vec<String>,
    pub closed: Vec<String>,
    pub writes: Vec<(String, Vec<u8>)>,
    pub live: usize,
    pub max_live: usize,
    pub behavior: WriteBehavior,
}

impl WireLog {
    /// Written commands as text, across all ports
    pub fn codes(&self) -> Vec<String> {
        self.writes
            .iter()
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).to_string())
            .collect()
    }
}

pub struct MockDriver {
    pub log: Arc<Mutex<WireLog>>,
    ports: Vec<String>,
    unavailable: Vec<String>,
    enumeration_fails: bool,
}

impl MockDriver {
    pub fn new(ports: &[&str]) -> Self {
        Self {
            log: Arc::new(Mutex::new(WireLog::default())),
            ports: ports.iter().map(|p| p.to_string()).collect(),
            unavailable: Vec::new(),
            enumeration_fails: false,
        }
    }

    /// Make opening `port` fail as if another program held it
    pub fn with_busy_port(mut self, port: &str) -> Self {
        self.unavailable.push(port.to_string());
        self
    }

    pub fn with_failing_enumeration(mut self) -> Self {
        self.enumeration_fails = true;
        self
    }
}

impl PortDriver for MockDriver {
    fn available_ports(&self) -> Result<Vec<SerialPortInfo>> {
        self.log.lock().enumerations += 1;
        if self.enumeration_fails {
            return Err(ConnectionError::Enumeration {
                reason: "udev unavailable".to_string(),
            }
            .into());
        }
        Ok(self
            .ports
            .iter()
            .map(|p| SerialPortInfo::new(p, "Mock Serial"))
            .collect())
    }

    fn open(&self, params: &ConnectionParams) -> Result<Box<dyn SerialPort>> {
        if self.unavailable.contains(&params.port) {
            return Err(ConnectionError::PortInUse {
                port: params.port.clone(),
                reason: "Device or resource busy".to_string(),
            }
            .into());
        }

        let mut log = self.log.lock();
        log.opened.push(params.port.clone());
        log.live += 1;
        log.max_live = log.max_live.max(log.live);

        Ok(Box::new(MockPort {
            name: params.port.clone(),
            log: Arc::clone(&self.log),
            open: true,
        }))
    }
}

struct MockPort {
    name: String,
    log: Arc<Mutex<WireLog>>,
    open: bool,
}

impl SerialPort for MockPort {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut log = self.log.lock();
        match log.behavior {
            WriteBehavior::Accept => {
                log.writes.push((self.name.clone(), data.to_vec()));
                Ok(data.len())
            }
            WriteBehavior::Short => {
                log.writes.push((self.name.clone(), data[..1].to_vec()));
                Ok(1)
            }
            WriteBehavior::Fail(kind) => Err(io::Error::new(kind, "device unplugged")),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        if self.open {
            self.open = false;
            let mut log = self.log.lock();
            log.live -= 1;
            log.closed.push(self.name.clone());
        }
        Ok(())
    }
}

impl Drop for MockPort {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
