//! Forwards interrupt/suspend signals to the Runner's foreground child
//! process, so Ctrl-C interrupts the user's running program rather than the
//! REPL itself. Ported from the host crate's own `src/signals.rs`.

use std::sync::atomic::{AtomicI32, AtomicBool, Ordering};

static FOREGROUND_PID: AtomicI32 = AtomicI32::new(0);
static SIGTSTP_RECEIVED: AtomicBool = AtomicBool::new(false);

pub fn set_foreground_pid(pid: u32) {
    FOREGROUND_PID.store(pid as i32, Ordering::SeqCst);
}

pub fn clear_foreground_pid() {
    FOREGROUND_PID.store(0, Ordering::SeqCst);
}

pub fn get_foreground_pid() -> Option<u32> {
    let pid = FOREGROUND_PID.load(Ordering::SeqCst);
    if pid > 0 {
        Some(pid as u32)
    } else {
        None
    }
}

pub fn check_sigtstp() -> bool {
    SIGTSTP_RECEIVED.swap(false, Ordering::SeqCst)
}

#[cfg(unix)]
pub fn setup_signal_handlers() -> Result<(), std::io::Error> {
    unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTSTP, || {
            SIGTSTP_RECEIVED.store(true, Ordering::SeqCst);
        })?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn setup_signal_handlers() -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(unix)]
pub fn interrupt_foreground() {
    if let Some(pid) = get_foreground_pid() {
        let _ = nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), nix::sys::signal::Signal::SIGINT);
    }
}

#[cfg(not(unix))]
pub fn interrupt_foreground() {}

#[cfg(unix)]
pub fn terminate_foreground() {
    if let Some(pid) = get_foreground_pid() {
        let _ = nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), nix::sys::signal::Signal::SIGTERM);
    }
}

#[cfg(not(unix))]
pub fn terminate_foreground() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreground_pid_roundtrip() {
        clear_foreground_pid();
        assert_eq!(get_foreground_pid(), None);
        set_foreground_pid(1234);
        assert_eq!(get_foreground_pid(), Some(1234));
        clear_foreground_pid();
        assert_eq!(get_foreground_pid(), None);
    }

    #[test]
    fn sigtstp_flag_consumes_once() {
        SIGTSTP_RECEIVED.store(true, Ordering::SeqCst);
        assert!(check_sigtstp());
        assert!(!check_sigtstp());
    }
}
