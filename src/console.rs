//! Line-oriented operator console
//!
//! Stands in for the jog window: each input line becomes one port action
//! or one press/release edge, and every status change is echoed back.
//! Pointer edges name a direction (`press left`); keyboard edges name a key
//! and go through the configured bindings (`keydown Left`).

use conveyorjog_communication::{Dispatch, JogOutcome, JogSession, StatusListener};
use conveyorjog_core::{
    Axis, Direction, EdgeKind, InputSource, JogEdge, SessionStatus, UserInputError,
};
use conveyorjog_settings::{Config, KeyBindings};
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const HELP: &str = "\
Commands:
  ports                      list serial ports and select the first
  select <port>              choose the port used by `connect`
  connect [port]             open the selected (or given) port
  disconnect                 stop motion and close the port
  press|release <direction>  on-screen button: left, right, up, down
  keydown|keyup <key>        keyboard key, via the configured bindings
  stop                       stop every moving axis
  status                     show the current status
  help                       show this text
  quit                       stop motion and exit";

/// Hint shown when an edge arrives with no open connection
pub const NOT_CONNECTED_HINT: &str = "Not connected (choose port, then connect)";

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Ports,
    Select(String),
    Connect(Option<String>),
    Disconnect,
    Button {
        kind: EdgeKind,
        axis: Axis,
        direction: Direction,
    },
    Key {
        kind: EdgeKind,
        key: String,
    },
    Stop,
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Option<std::result::Result<Self, String>> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_ascii_lowercase();
        let arg = words.next();

        let parsed = match (verb.as_str(), arg) {
            ("ports" | "refresh", _) => Ok(ConsoleCommand::Ports),
            ("select", Some(port)) => Ok(ConsoleCommand::Select(port.to_string())),
            ("connect", port) => Ok(ConsoleCommand::Connect(port.map(str::to_string))),
            ("disconnect", _) => Ok(ConsoleCommand::Disconnect),
            ("press" | "release", Some(word)) => parse_direction(word).map(|(axis, direction)| {
                ConsoleCommand::Button {
                    kind: edge_kind(&verb),
                    axis,
                    direction,
                }
            }),
            ("keydown" | "keyup", Some(key)) => Ok(ConsoleCommand::Key {
                kind: if verb == "keydown" {
                    EdgeKind::Press
                } else {
                    EdgeKind::Release
                },
                key: key.to_string(),
            }),
            ("stop", _) => Ok(ConsoleCommand::Stop),
            ("status", _) => Ok(ConsoleCommand::Status),
            ("help" | "?", _) => Ok(ConsoleCommand::Help),
            ("quit" | "exit", _) => Ok(ConsoleCommand::Quit),
            ("select" | "press" | "release" | "keydown" | "keyup", None) => {
                Err(format!("`{}` needs an argument", verb))
            }
            (other, _) => Err(format!("Unknown command `{}`", other)),
        };
        Some(parsed)
    }
}

fn edge_kind(verb: &str) -> EdgeKind {
    if verb == "press" {
        EdgeKind::Press
    } else {
        EdgeKind::Release
    }
}

fn parse_direction(word: &str) -> std::result::Result<(Axis, Direction), String> {
    match word.to_ascii_lowercase().as_str() {
        "left" => Ok((Axis::X, Direction::Negative)),
        "right" => Ok((Axis::X, Direction::Positive)),
        "up" => Ok((Axis::Y, Direction::Positive)),
        "down" => Ok((Axis::Y, Direction::Negative)),
        other => Err(format!("Unknown direction `{}`", other)),
    }
}

/// Whether the console should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Collects status changes until the console prints them
#[derive(Default)]
struct StatusQueue {
    pending: Mutex<Vec<SessionStatus>>,
}

impl StatusListener for StatusQueue {
    fn on_status_changed(&self, status: &SessionStatus) {
        self.pending.lock().push(status.clone());
    }
}

/// Operator console driving a jog session
pub struct JogConsole {
    jog: JogSession,
    keys: KeyBindings,
    preferred_port: Option<String>,
    statuses: Arc<StatusQueue>,
}

impl JogConsole {
    pub fn new(mut jog: JogSession, config: &Config) -> Self {
        let statuses = Arc::new(StatusQueue::default());
        jog.session_mut().add_listener(statuses.clone());

        Self {
            jog,
            keys: config.keys.clone(),
            preferred_port: config.connection.preferred_port().map(str::to_string),
            statuses,
        }
    }

    pub fn jog(&self) -> &JogSession {
        &self.jog
    }

    /// Read commands until `quit` or end of input, then stop all motion
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.jog.session().status())?;
        self.execute(ConsoleCommand::Ports, &mut out)?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            let flow = match ConsoleCommand::parse(&line) {
                None => Flow::Continue,
                Some(Ok(command)) => self.execute(command, &mut out)?,
                Some(Err(message)) => {
                    writeln!(out, "{}", message)?;
                    writeln!(out, "{}", HELP)?;
                    Flow::Continue
                }
            };
            out.flush()?;
            if flow == Flow::Quit {
                break;
            }
        }

        self.jog.stop_all();
        self.flush_statuses(&mut out)?;
        out.flush()
    }

    /// Execute one command and print the resulting status changes
    pub fn execute(&mut self, command: ConsoleCommand, out: &mut impl Write) -> io::Result<Flow> {
        tracing::debug!("Console command: {:?}", command);

        match command {
            ConsoleCommand::Ports => {
                let ports = self
                    .jog
                    .session_mut()
                    .refresh_ports(self.preferred_port.as_deref());
                if ports.is_empty() {
                    writeln!(out, "No serial ports found")?;
                }
                let selected = self.jog.session().selected_port();
                for info in ports {
                    let marker = if selected == Some(info.port_name.as_str()) {
                        '*'
                    } else {
                        ' '
                    };
                    writeln!(out, "{} {}  ({})", marker, info.port_name, info.description)?;
                }
            }
            ConsoleCommand::Select(port) => {
                self.jog.session_mut().select_port(port);
                if let Some(port) = self.jog.session().selected_port() {
                    writeln!(out, "Selected {}", port)?;
                }
            }
            ConsoleCommand::Connect(port) => {
                if let Some(port) = port {
                    self.jog.session_mut().select_port(port);
                }
                if let Err(e) = self.jog.connect_selected() {
                    tracing::debug!("Console connect failed: {}", e);
                }
            }
            ConsoleCommand::Disconnect => self.jog.disconnect(),
            ConsoleCommand::Button {
                kind,
                axis,
                direction,
            } => {
                let edge = JogEdge {
                    axis,
                    direction,
                    kind,
                    source: InputSource::Pointer,
                };
                let outcomes = self.jog.handle_edge(edge);
                self.report(&outcomes, out)?;
            }
            ConsoleCommand::Key { kind, key } => match self.keys.resolve(&key) {
                Some((axis, direction)) => {
                    let edge = JogEdge {
                        axis,
                        direction,
                        kind,
                        source: InputSource::Keyboard,
                    };
                    let outcomes = self.jog.handle_edge(edge);
                    self.report(&outcomes, out)?;
                }
                None => writeln!(out, "{}", UserInputError::UnknownKey { key })?,
            },
            ConsoleCommand::Stop => {
                let outcomes = self.jog.stop_all();
                self.report(&outcomes, out)?;
            }
            ConsoleCommand::Status => {
                writeln!(out, "{}", self.jog.session().status())?;
                for axis in Axis::ALL {
                    match self.jog.held_by(axis) {
                        Some(source) => writeln!(
                            out,
                            "  {}: {} ({})",
                            axis,
                            self.jog.axis_state(axis),
                            source
                        )?,
                        None => writeln!(out, "  {}: {}", axis, self.jog.axis_state(axis))?,
                    }
                }
            }
            ConsoleCommand::Help => {
                writeln!(out, "{}", HELP)?;
                self.write_bindings(out)?;
            }
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }

        self.flush_statuses(out)?;
        Ok(Flow::Continue)
    }

    fn write_bindings(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Keys:")?;
        for (word, axis, direction) in [
            ("left", Axis::X, Direction::Negative),
            ("right", Axis::X, Direction::Positive),
            ("up", Axis::Y, Direction::Positive),
            ("down", Axis::Y, Direction::Negative),
        ] {
            writeln!(out, "  {:<6} {}", word, self.keys.key_for(axis, direction))?;
        }
        Ok(())
    }

    fn report(&self, outcomes: &[JogOutcome], out: &mut impl Write) -> io::Result<()> {
        let dropped = outcomes
            .iter()
            .any(|o| matches!(o.result, Ok(Dispatch::NotConnected)));
        if dropped {
            // Replaces the plain "Not connected" status with the hint.
            self.statuses.pending.lock().clear();
            writeln!(out, "{}", NOT_CONNECTED_HINT)?;
        }
        Ok(())
    }

    fn flush_statuses(&self, out: &mut impl Write) -> io::Result<()> {
        let pending = std::mem::take(&mut *self.statuses.pending.lock());
        for status in pending {
            writeln!(out, "{}", status)?;
        }
        Ok(())
    }
}
