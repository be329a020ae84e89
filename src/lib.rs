//! # ConveyorJog
//!
//! Operator console for jogging a two-axis conveyor stage over a serial
//! link. Holding a direction sends one two-byte move command; letting go
//! sends the matching stop.
//!
//! ## Architecture
//!
//! ConveyorJog is organized as a workspace with multiple crates:
//!
//! 1. **conveyorjog-core** - Wire commands, per-axis state machines, status, errors
//! 2. **conveyorjog-communication** - Serial transport and session lifecycle
//! 3. **conveyorjog-settings** - Connection preferences and key bindings
//! 4. **conveyorjog** - Logging, the operator console, and the binary

pub mod console;

pub use console::{ConsoleCommand, Flow, JogConsole, NOT_CONNECTED_HINT};

pub use conveyorjog_core::{
    Axis, AxisController, AxisState, Command, ConnectionError, Direction, EdgeKind, Error,
    InputSource, JogEdge, Result, SessionStatus, UserInputError, WriteError,
};

pub use conveyorjog_communication::{
    list_ports, ConnectionHandle, ConnectionParams, Dispatch, JogOutcome, JogSession,
    PortDriver, SerialPort, SerialPortInfo, SessionManager, StatusListener, StatusListenerHandle,
    SystemPortDriver, JOG_BAUD_RATE,
};

pub use conveyorjog_settings::{Config, ConnectionSettings, KeyBindings, LoggingSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr so console output on stdout stays readable
/// - RUST_LOG environment variable support, falling back to `default_level`
/// - Thread and line information for every event
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", default_level, e))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
