//! Session layer
//!
//! Lifecycle of the serial connection and dispatch of jog commands, plus
//! the wiring from input edges through the per-axis controllers.

pub mod jog;
pub mod listener;
pub mod manager;

pub use jog::{JogOutcome, JogSession};
pub use listener::{StatusListener, StatusListenerHandle};
pub use manager::{Dispatch, SessionManager};
