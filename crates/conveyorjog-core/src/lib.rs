//! # ConveyorJog Core
//!
//! Core types and state machines for ConveyorJog.
//! Provides the jog wire commands, the per-axis edge-triggered
//! controller, the operator-facing session status, and the error model.
//! Nothing in this crate performs I/O.

pub mod error;
pub mod jog;
pub mod status;

pub use error::{ConnectionError, Error, Result, UserInputError, WriteError};

pub use jog::{
    Axis, AxisController, AxisState, Command, Direction, EdgeKind, InputSource, JogEdge,
};

pub use status::SessionStatus;
