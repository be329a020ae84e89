//! Per-axis jog state machine
//!
//! Converts press/release edges into the commands the firmware expects.
//! Pointer and keyboard edges feed the same machine, so a hold started with
//! one source can be ended with the other.
//!
//! Directions on one axis are mutually exclusive and the last press wins:
//! pressing the opposite direction while moving stops the axis and then
//! starts it the other way. Every move command is therefore followed by
//! exactly one stop command.

use super::command::{Axis, Command, Direction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion state of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisState {
    #[default]
    Idle,
    MovingPositive,
    MovingNegative,
}

impl AxisState {
    /// State entered by a move in `direction`
    pub fn moving(direction: Direction) -> Self {
        match direction {
            Direction::Positive => AxisState::MovingPositive,
            Direction::Negative => AxisState::MovingNegative,
        }
    }

    /// Direction of travel, if moving
    pub fn direction(self) -> Option<Direction> {
        match self {
            AxisState::Idle => None,
            AxisState::MovingPositive => Some(Direction::Positive),
            AxisState::MovingNegative => Some(Direction::Negative),
        }
    }

    pub fn is_moving(self) -> bool {
        self != AxisState::Idle
    }
}

impl fmt::Display for AxisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisState::Idle => write!(f, "IDLE"),
            AxisState::MovingPositive => write!(f, "MOVING_POSITIVE"),
            AxisState::MovingNegative => write!(f, "MOVING_NEGATIVE"),
        }
    }
}

/// Where an edge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    /// On-screen button held with the pointer
    Pointer,
    /// Keyboard key held down
    Keyboard,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Pointer => write!(f, "pointer"),
            InputSource::Keyboard => write!(f, "keyboard"),
        }
    }
}

/// Press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    Press,
    Release,
}

/// A discrete input transition tagged with axis and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JogEdge {
    pub axis: Axis,
    pub direction: Direction,
    pub kind: EdgeKind,
    pub source: InputSource,
}

impl JogEdge {
    pub fn press(axis: Axis, direction: Direction, source: InputSource) -> Self {
        Self {
            axis,
            direction,
            kind: EdgeKind::Press,
            source,
        }
    }

    pub fn release(axis: Axis, direction: Direction, source: InputSource) -> Self {
        Self {
            axis,
            direction,
            kind: EdgeKind::Release,
            source,
        }
    }
}

/// Edge-triggered jog controller for a single axis
#[derive(Debug, Clone)]
pub struct AxisController {
    axis: Axis,
    state: AxisState,
    /// Source of the press that started the current motion
    held_by: Option<InputSource>,
}

impl AxisController {
    /// Create an idle controller for `axis`
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            state: AxisState::Idle,
            held_by: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn state(&self) -> AxisState {
        self.state
    }

    /// Source that started the current motion, if moving
    pub fn held_by(&self) -> Option<InputSource> {
        self.held_by
    }

    /// Apply one edge and return the commands to send, in order
    ///
    /// Returns an empty list for no-op edges: repeated presses of the
    /// active direction, releases while idle, releases of the inactive
    /// direction, and edges addressed to the other axis.
    pub fn handle_edge(&mut self, edge: &JogEdge) -> Vec<Command> {
        if edge.axis != self.axis {
            tracing::debug!(
                "Axis {} controller ignoring edge for axis {}",
                self.axis,
                edge.axis
            );
            return Vec::new();
        }

        let previous = self.state;
        let commands = match edge.kind {
            EdgeKind::Press => self.press(edge.direction, edge.source),
            EdgeKind::Release => self.release(edge.direction),
        };

        if previous != self.state {
            tracing::debug!(
                "Axis {}: {} -> {} ({:?} {:?})",
                self.axis,
                previous,
                self.state,
                edge.source,
                edge.kind
            );
        }

        commands
    }

    /// Force the axis idle, returning the stop command if it was moving
    pub fn stop(&mut self) -> Option<Command> {
        if !self.state.is_moving() {
            return None;
        }
        self.state = AxisState::Idle;
        self.held_by = None;
        Some(self.axis.stop_command())
    }

    fn press(&mut self, direction: Direction, source: InputSource) -> Vec<Command> {
        match self.state.direction() {
            Some(active) if active == direction => Vec::new(),
            Some(_) => {
                // Reversal: stop first so every move keeps its own stop.
                self.state = AxisState::moving(direction);
                self.held_by = Some(source);
                vec![
                    self.axis.stop_command(),
                    self.axis.move_command(direction),
                ]
            }
            None => {
                self.state = AxisState::moving(direction);
                self.held_by = Some(source);
                vec![self.axis.move_command(direction)]
            }
        }
    }

    fn release(&mut self, direction: Direction) -> Vec<Command> {
        match self.state.direction() {
            Some(active) if active == direction => {
                self.state = AxisState::Idle;
                self.held_by = None;
                vec![self.axis.stop_command()]
            }
            _ => Vec::new(),
        }
    }
}
