//! Jog wire commands
//!
//! Every command is exactly two ASCII bytes with no terminator and no
//! checksum. The firmware keeps an axis moving from the move command until
//! the matching stop command arrives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conveyor axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal axis (left/right)
    X,
    /// Vertical axis (up/down)
    Y,
}

impl Axis {
    /// Both axes, in dispatch order
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Stop command for this axis
    pub fn stop_command(self) -> Command {
        match self {
            Axis::X => Command::XStop,
            Axis::Y => Command::YStop,
        }
    }

    /// Move command for this axis in `direction`
    pub fn move_command(self, direction: Direction) -> Command {
        match (self, direction) {
            (Axis::X, Direction::Positive) => Command::XRight,
            (Axis::X, Direction::Negative) => Command::XLeft,
            (Axis::Y, Direction::Positive) => Command::YUp,
            (Axis::Y, Direction::Negative) => Command::YDown,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Direction of travel along an axis
///
/// Positive is right on X and up on Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// The other direction on the same axis
    pub fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

/// Two-byte motion command understood by the conveyor firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// `XL`: move X negative
    XLeft,
    /// `XR`: move X positive
    XRight,
    /// `XS`: stop X
    XStop,
    /// `YU`: move Y positive
    YUp,
    /// `YD`: move Y negative
    YDown,
    /// `YS`: stop Y
    YStop,
}

impl Command {
    /// Every command in the protocol
    pub const ALL: [Command; 6] = [
        Command::XLeft,
        Command::XRight,
        Command::XStop,
        Command::YUp,
        Command::YDown,
        Command::YStop,
    ];

    /// Wire code as text
    pub fn code(self) -> &'static str {
        match self {
            Command::XLeft => "XL",
            Command::XRight => "XR",
            Command::XStop => "XS",
            Command::YUp => "YU",
            Command::YDown => "YD",
            Command::YStop => "YS",
        }
    }

    /// Raw bytes written to the device
    pub fn as_bytes(self) -> [u8; 2] {
        let code = self.code().as_bytes();
        [code[0], code[1]]
    }

    /// Axis this command acts on
    pub fn axis(self) -> Axis {
        match self {
            Command::XLeft | Command::XRight | Command::XStop => Axis::X,
            Command::YUp | Command::YDown | Command::YStop => Axis::Y,
        }
    }

    pub fn is_stop(self) -> bool {
        matches!(self, Command::XStop | Command::YStop)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown jog command: {}", s))
    }
}
