//! Runner (spec §4.5): compiles and executes the session file plus extra
//! files as a single synthetic program, piping stderr through the error
//! filter. Grounded on `original_source/session.go::goRun`.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::errfilter::ErrFilter;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("could not spawn host toolchain: {0}")]
    Spawn(#[source] std::io::Error),
}

#[derive(Debug)]
pub struct RunOutcome {
    pub exit_code: Option<i32>,
}

impl RunOutcome {
    /// Exit code 2 (compilation or runtime panic) triggers rollback (spec
    /// §4.5); any other non-zero code surfaces as command-failure without
    /// rollback.
    pub fn should_rollback(&self) -> bool {
        self.exit_code == Some(2)
    }
}

/// Runs `go run -mod=mod <extra files...> <session file>` in `dir`, with
/// the REPL's own stdin/stdout inherited by the child and stderr piped
/// through `ErrFilter`. Blocks until the child exits.
pub fn run(dir: &Path, session_file_name: &str, extra_files: &[String]) -> Result<RunOutcome, RunError> {
    let mut cmd = Command::new("go");
    cmd.arg("run").arg("-mod=mod");
    for f in extra_files {
        cmd.arg(f);
    }
    cmd.arg(session_file_name);
    cmd.current_dir(dir);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(RunError::Spawn)?;
    crate::signals::set_foreground_pid(child.id());

    let mut child_stderr = child.stderr.take().expect("stderr was piped");
    let session_file_name = session_file_name.to_string();
    let copier = std::thread::spawn(move || {
        let mut filter = ErrFilter::new(io::stderr(), session_file_name);
        let _ = io::copy(&mut child_stderr, &mut filter);
    });

    let status = child.wait().map_err(RunError::Spawn)?;
    let _ = copier.join();
    crate::signals::clear_foreground_pid();

    Ok(RunOutcome { exit_code: status.code() })
}
