mod common;

use common::{MockDriver, WriteBehavior};
use conveyorjog_communication::{Dispatch, JogSession, SessionManager};
use conveyorjog_core::{
    Axis, AxisState, Command, Direction, EdgeKind, InputSource, JogEdge, SessionStatus,
};
use proptest::prelude::*;
use std::io;
use std::sync::Arc;

fn connected(ports: &[&str]) -> (JogSession, Arc<parking_lot::Mutex<common::WireLog>>) {
    let driver = MockDriver::new(ports);
    let log = Arc::clone(&driver.log);
    let mut jog = JogSession::new(SessionManager::new(Box::new(driver)));
    jog.connect(ports[0]).unwrap();
    (jog, log)
}

#[test]
fn test_press_and_release_right() {
    let (mut jog, log) = connected(&["COM7"]);

    let outcomes = jog.handle_edge(JogEdge::press(
        Axis::X,
        Direction::Positive,
        InputSource::Pointer,
    ));
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_sent());
    assert_eq!(log.lock().codes(), vec!["XR"]);

    jog.handle_edge(JogEdge::release(
        Axis::X,
        Direction::Positive,
        InputSource::Pointer,
    ));
    assert_eq!(log.lock().codes(), vec!["XR", "XS"]);
    assert_eq!(jog.axis_state(Axis::Y), AxisState::Idle);
}

#[test]
fn test_keyboard_autorepeat_sends_one_move() {
    let (mut jog, log) = connected(&["COM7"]);
    let press = JogEdge::press(Axis::Y, Direction::Positive, InputSource::Keyboard);

    for _ in 0..10 {
        jog.handle_edge(press);
    }
    jog.handle_edge(JogEdge::release(
        Axis::Y,
        Direction::Positive,
        InputSource::Keyboard,
    ));
    jog.handle_edge(JogEdge::release(
        Axis::Y,
        Direction::Positive,
        InputSource::Keyboard,
    ));

    assert_eq!(log.lock().codes(), vec!["YU", "YS"]);
}

#[test]
fn test_pointer_press_keyboard_release() {
    let (mut jog, log) = connected(&["COM7"]);

    jog.handle_edge(JogEdge::press(
        Axis::X,
        Direction::Negative,
        InputSource::Pointer,
    ));
    jog.handle_edge(JogEdge::release(
        Axis::X,
        Direction::Negative,
        InputSource::Keyboard,
    ));
    jog.handle_edge(JogEdge::release(
        Axis::X,
        Direction::Negative,
        InputSource::Pointer,
    ));

    assert_eq!(log.lock().codes(), vec!["XL", "XS"]);
}

#[test]
fn test_axes_interleave_independently() {
    let (mut jog, log) = connected(&["COM7"]);

    jog.handle_edge(JogEdge::press(Axis::X, Direction::Positive, InputSource::Pointer));
    jog.handle_edge(JogEdge::press(Axis::Y, Direction::Negative, InputSource::Keyboard));
    jog.handle_edge(JogEdge::release(Axis::X, Direction::Positive, InputSource::Pointer));
    assert_eq!(jog.axis_state(Axis::Y), AxisState::MovingNegative);
    jog.handle_edge(JogEdge::release(Axis::Y, Direction::Negative, InputSource::Keyboard));

    assert_eq!(log.lock().codes(), vec!["XR", "YD", "XS", "YS"]);
}

#[test]
fn test_reversal_sends_stop_before_new_move() {
    let (mut jog, log) = connected(&["COM7"]);

    jog.handle_edge(JogEdge::press(Axis::Y, Direction::Positive, InputSource::Pointer));
    let outcomes = jog.handle_edge(JogEdge::press(
        Axis::Y,
        Direction::Negative,
        InputSource::Keyboard,
    ));
    let sent: Vec<Command> = outcomes.iter().map(|o| o.command).collect();
    assert_eq!(sent, vec![Command::YStop, Command::YDown]);
    assert_eq!(log.lock().codes(), vec!["YU", "YS", "YD"]);
}

#[test]
fn test_stop_all_only_stops_moving_axes() {
    let (mut jog, log) = connected(&["COM7"]);

    assert!(jog.stop_all().is_empty());
    jog.handle_edge(JogEdge::press(Axis::Y, Direction::Negative, InputSource::Pointer));
    let outcomes = jog.stop_all();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].command, Command::YStop);
    assert_eq!(log.lock().codes(), vec!["YD", "YS"]);
    assert_eq!(jog.axis_state(Axis::Y), AxisState::Idle);
}

#[test]
fn test_switching_port_stops_old_device_first() {
    let (mut jog, log) = connected(&["COM3", "COM7"]);

    jog.handle_edge(JogEdge::press(Axis::X, Direction::Positive, InputSource::Pointer));
    jog.connect("COM7").unwrap();

    let log = log.lock();
    assert_eq!(
        log.writes,
        vec![
            ("COM3".to_string(), b"XR".to_vec()),
            ("COM3".to_string(), b"XS".to_vec()),
        ]
    );
    assert_eq!(log.closed, vec!["COM3"]);
    assert_eq!(log.max_live, 1);
    assert_eq!(jog.axis_state(Axis::X), AxisState::Idle);
}

#[test]
fn test_disconnect_and_drop_stop_motion() {
    let (mut jog, log) = connected(&["COM7"]);
    jog.handle_edge(JogEdge::press(Axis::X, Direction::Negative, InputSource::Pointer));
    jog.disconnect();
    assert_eq!(log.lock().codes(), vec!["XL", "XS"]);
    assert_eq!(jog.session().status(), &SessionStatus::Disconnected);

    let (mut jog, log) = connected(&["COM7"]);
    jog.handle_edge(JogEdge::press(Axis::Y, Direction::Positive, InputSource::Keyboard));
    drop(jog);
    let log = log.lock();
    assert_eq!(log.codes(), vec!["YU", "YS"]);
    assert_eq!(log.live, 0);
}

#[test]
fn test_edges_while_disconnected_are_reported_not_sent() {
    let driver = MockDriver::new(&["COM7"]);
    let log = Arc::clone(&driver.log);
    let mut jog = JogSession::new(SessionManager::new(Box::new(driver)));

    let outcomes = jog.handle_edge(JogEdge::press(
        Axis::X,
        Direction::Positive,
        InputSource::Pointer,
    ));
    assert!(matches!(outcomes[0].result, Ok(Dispatch::NotConnected)));
    assert!(log.lock().writes.is_empty());
}

#[test]
fn test_failed_write_still_tracks_state() {
    let (mut jog, log) = connected(&["COM7"]);
    log.lock().behavior = WriteBehavior::Fail(io::ErrorKind::BrokenPipe);

    let outcomes = jog.handle_edge(JogEdge::press(
        Axis::X,
        Direction::Positive,
        InputSource::Pointer,
    ));
    assert!(outcomes[0].result.is_err());
    assert_eq!(jog.axis_state(Axis::X), AxisState::MovingPositive);
    assert!(jog.session().status().is_error());

    log.lock().behavior = WriteBehavior::Accept;
    jog.handle_edge(JogEdge::release(
        Axis::X,
        Direction::Positive,
        InputSource::Pointer,
    ));
    assert_eq!(log.lock().codes(), vec!["XS"]);
}

fn any_edge() -> impl Strategy<Value = JogEdge> {
    (
        prop_oneof![Just(Axis::X), Just(Axis::Y)],
        prop_oneof![Just(Direction::Positive), Just(Direction::Negative)],
        prop_oneof![Just(EdgeKind::Press), Just(EdgeKind::Release)],
        prop_oneof![Just(InputSource::Pointer), Just(InputSource::Keyboard)],
    )
        .prop_map(|(axis, direction, kind, source)| JogEdge {
            axis,
            direction,
            kind,
            source,
        })
}

proptest! {
    #[test]
    fn disconnected_session_never_writes(edges in prop::collection::vec(any_edge(), 0..64)) {
        let driver = MockDriver::new(&["COM7"]);
        let log = Arc::clone(&driver.log);
        let mut jog = JogSession::new(SessionManager::new(Box::new(driver)));

        for edge in edges {
            for outcome in jog.handle_edge(edge) {
                prop_assert!(matches!(outcome.result, Ok(Dispatch::NotConnected)));
            }
        }
        drop(jog);

        let log = log.lock();
        prop_assert!(log.opened.is_empty());
        prop_assert!(log.writes.is_empty());
    }

    #[test]
    fn every_move_on_the_wire_is_stopped(edges in prop::collection::vec(any_edge(), 0..64)) {
        let (mut jog, log) = connected(&["COM7"]);
        for edge in edges {
            jog.handle_edge(edge);
        }
        jog.disconnect();

        let codes = log.lock().codes();
        for axis in ["X", "Y"] {
            let on_axis: Vec<&String> = codes.iter().filter(|c| c.starts_with(axis)).collect();
            let stops = on_axis.iter().filter(|c| c.ends_with('S')).count();
            prop_assert_eq!(stops * 2, on_axis.len());
        }
    }
}
