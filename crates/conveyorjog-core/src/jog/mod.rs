//! Jog protocol model
//!
//! Wire commands plus the per-axis state machine that produces them.

pub mod axis;
pub mod command;

pub use axis::{AxisController, AxisState, EdgeKind, InputSource, JogEdge};
pub use command::{Axis, Command, Direction};
