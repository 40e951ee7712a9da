//! The type-checker collaborator (spec §1: "the host-language toolchain ...
//! the core consumes these as opaque services").
//!
//! There is no embedded Go type checker here; `GoTypeChecker` shells out to
//! the real `go build` the same way the host crate's `shell.rs::BashProcess`
//! shells out to a real `bash` — the external toolchain is a genuine child
//! process, piped and parsed, not reimplemented.

use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TypeCheckError {
    #[error("could not invoke host toolchain: {0}")]
    Spawn(#[from] std::io::Error),
}

pub trait TypeChecker {
    /// Type-checks `main_file` plus `extra_files`, all resolved relative to
    /// `dir`. `Ok(())` means the program type-checks cleanly; `Err` carries
    /// every diagnostic line the toolchain produced, parsed into
    /// `TypeError`s (lines that don't match `file:line:col: message` are
    /// dropped, matching the original `errFilter`'s tolerance of banner
    /// noise).
    fn check(&self, dir: &Path, main_file: &str, extra_files: &[String]) -> Result<Vec<TypeError>, TypeCheckError>;
}

pub struct GoTypeChecker;

impl TypeChecker for GoTypeChecker {
    fn check(&self, dir: &Path, main_file: &str, extra_files: &[String]) -> Result<Vec<TypeError>, TypeCheckError> {
        let mut cmd = Command::new("go");
        cmd.arg("build").arg("-o").arg(std::env::temp_dir().join("gore-typecheck-out"));
        cmd.arg(main_file);
        for f in extra_files {
            cmd.arg(f);
        }
        cmd.current_dir(dir);
        let output = cmd.output()?;
        if output.status.success() {
            return Ok(vec![]);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(parse_diagnostics(&stderr))
    }
}

/// Parses `go build` stderr into structured diagnostics. Lines that are not
/// of the form `file:line:col: message` (banners, warnings) are skipped;
/// the Runner's error filter handles presenting the equivalent noise to the
/// user when it shows up on the Runner's own stderr instead.
pub fn parse_diagnostics(stderr: &str) -> Vec<TypeError> {
    let mut out = Vec::new();
    for raw_line in stderr.lines() {
        if let Some(err) = parse_diagnostic_line(raw_line) {
            out.push(err);
        }
    }
    out
}

fn parse_diagnostic_line(line: &str) -> Option<TypeError> {
    let mut parts = line.splitn(4, ':');
    let file = parts.next()?;
    let line_no: usize = parts.next()?.trim().parse().ok()?;
    let col: usize = parts.next()?.trim().parse().ok()?;
    let message = parts.next()?.trim().to_string();
    if file.is_empty() || message.is_empty() {
        return None;
    }
    Some(TypeError { file: file.to_string(), line: line_no, col, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_diagnostic() {
        let stderr = "./gore_session.go:12:2: x declared and not used\n";
        let errs = parse_diagnostics(stderr);
        assert_eq!(errs, vec![TypeError { file: "./gore_session.go".into(), line: 12, col: 2, message: "x declared and not used".into() }]);
    }

    #[test]
    fn skips_banner_and_blank_lines() {
        let stderr = "# command-line-arguments\n./gore_session.go:12:2: x declared and not used\n\n";
        let errs = parse_diagnostics(stderr);
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn parses_used_as_value_suffix() {
        let stderr = "./gore_session.go:9:8: log.SetPrefix(\"\") (no value) used as value\n";
        let errs = parse_diagnostics(stderr);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.ends_with("used as value"));
    }
}
