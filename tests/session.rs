//! End-to-end session scenarios (spec §8). These need a real `go`
//! toolchain on `PATH` to compile/run the synthetic program, so they are
//! `#[ignore]`d by default; run with `cargo test -- --ignored` in an
//! environment with Go installed.

use std::path::PathBuf;

use gore::session::Session;

fn new_session() -> Session {
    Session::new(PathBuf::from("."), false).expect("session start requires a working `go` toolchain")
}

#[test]
#[ignore]
fn expression_echoes_its_value() {
    let mut session = new_session();
    session.eval("1 + 1").unwrap();
    assert_eq!(session.file.main().body.len(), 1);
}

#[test]
#[ignore]
fn assignment_binds_a_name_that_a_later_expression_can_reference() {
    let mut session = new_session();
    session.eval("x := 1").unwrap();
    session.eval("x").unwrap();
}

#[test]
#[ignore]
fn failing_input_leaves_the_session_unchanged() {
    let mut session = new_session();
    let snapshot = session.file.clone();
    let _ = session.eval("this is not valid Go");
    assert_eq!(session.file, snapshot);
}

#[test]
#[ignore]
fn clear_command_reinitializes_the_session() {
    let mut session = new_session();
    session.eval("x := 1").unwrap();
    session.eval(":clear").unwrap();
    assert!(session.file.main().body.is_empty());
}

#[test]
#[ignore]
fn quit_command_returns_the_quit_sentinel() {
    let mut session = new_session();
    let err = session.eval(":quit").unwrap_err();
    assert!(matches!(err, gore::session::SessionError::Quit));
}
