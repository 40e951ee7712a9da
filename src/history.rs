//! Persisted REPL history under `GORE_HOME` (spec §6). Grounded on
//! `original_source/gore.go::homeDir`'s environment-variable precedence and
//! the host crate's own `rcfile.rs::dirs_home` pattern of resolving a
//! home-like directory by hand rather than via a `dirs` crate.

use std::env;
use std::path::PathBuf;

/// `GORE_HOME`, then `XDG_DATA_HOME/gore`, then `$HOME/.gore`.
pub fn home_dir() -> Option<PathBuf> {
    if let Some(home) = env::var_os("GORE_HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("gore"));
        }
    }
    env::var_os("HOME").map(|h| PathBuf::from(h).join(".gore"))
}

pub fn history_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join("history"))
}

pub fn load(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn save(path: &std::path::Path, lines: &[String]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gore_home_takes_precedence() {
        // SAFETY: test-local env mutation, restored unconditionally below.
        unsafe {
            env::set_var("GORE_HOME", "/tmp/gore-test-home");
            env::set_var("XDG_DATA_HOME", "/tmp/should-not-use");
        }
        assert_eq!(home_dir(), Some(PathBuf::from("/tmp/gore-test-home")));
        unsafe {
            env::remove_var("GORE_HOME");
            env::remove_var("XDG_DATA_HOME");
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("history");
        save(&path, &["foo".to_string(), "bar".to_string()]).unwrap();
        assert_eq!(load(&path), vec!["foo".to_string(), "bar".to_string()]);
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("nope")).is_empty());
    }
}
