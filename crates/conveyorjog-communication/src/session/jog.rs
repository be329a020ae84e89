//! Jog session
//!
//! Routes input edges to the X and Y axis controllers and sends whatever
//! they emit through the session manager, one edge at a time. Closing or
//! replacing the connection first stops any axis still moving so the
//! firmware is never left running without a way to stop it.

use super::manager::{Dispatch, SessionManager};
use conveyorjog_core::{
    Axis, AxisController, AxisState, Command, InputSource, JogEdge, Result, SessionStatus,
};

/// Result of sending one command produced by an edge
#[derive(Debug)]
pub struct JogOutcome {
    pub command: Command,
    pub result: Result<Dispatch>,
}

impl JogOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self.result, Ok(Dispatch::Sent { .. }))
    }
}

/// Two independent axis controllers sharing one session
#[derive(Debug)]
pub struct JogSession {
    session: SessionManager,
    x: AxisController,
    y: AxisController,
}

impl JogSession {
    pub fn new(session: SessionManager) -> Self {
        Self {
            session,
            x: AxisController::new(Axis::X),
            y: AxisController::new(Axis::Y),
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    pub fn axis_state(&self, axis: Axis) -> AxisState {
        self.controller(axis).state()
    }

    /// Input source that started the current move on `axis`
    pub fn held_by(&self, axis: Axis) -> Option<InputSource> {
        self.controller(axis).held_by()
    }

    /// Process one edge to completion
    ///
    /// Every emitted command is attempted, in order, even if an earlier one
    /// failed. Failures are already reflected in the session status.
    pub fn handle_edge(&mut self, edge: JogEdge) -> Vec<JogOutcome> {
        let commands = self.controller_mut(edge.axis).handle_edge(&edge);
        self.send_all(commands)
    }

    /// Stop every moving axis
    pub fn stop_all(&mut self) -> Vec<JogOutcome> {
        let commands: Vec<Command> = Axis::ALL
            .into_iter()
            .filter_map(|axis| self.controller_mut(axis).stop())
            .collect();
        self.send_all(commands)
    }

    /// Stop moving axes on the current connection, then connect to `device_id`
    pub fn connect(&mut self, device_id: &str) -> Result<SessionStatus> {
        if !device_id.trim().is_empty() {
            self.stop_all();
        }
        self.session.connect(device_id)
    }

    /// Connect to the session's selected port
    pub fn connect_selected(&mut self) -> Result<SessionStatus> {
        if self.session.selected_port().is_some() {
            self.stop_all();
        }
        self.session.connect_selected()
    }

    /// Stop moving axes, then close the connection
    pub fn disconnect(&mut self) {
        self.stop_all();
        self.session.disconnect();
    }

    fn send_all(&mut self, commands: Vec<Command>) -> Vec<JogOutcome> {
        commands
            .into_iter()
            .map(|command| JogOutcome {
                command,
                result: self.session.dispatch(command),
            })
            .collect()
    }

    fn controller(&self, axis: Axis) -> &AxisController {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn controller_mut(&mut self, axis: Axis) -> &mut AxisController {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }
}

impl Drop for JogSession {
    fn drop(&mut self) {
        if self.session.is_connected() {
            self.stop_all();
        }
    }
}
