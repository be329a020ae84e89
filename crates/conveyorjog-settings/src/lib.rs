//! ConveyorJog Settings Crate
//!
//! Handles application configuration: connection preferences, keyboard
//! bindings, and logging.

pub mod config;

pub use config::{Config, ConnectionSettings, KeyBindings, LoggingSettings, MAX_TIMEOUT_MS};
