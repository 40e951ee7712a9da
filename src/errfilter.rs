//! Error filter (spec §4.5): line-buffers the Runner's child-process stderr
//! and rewrites it to hide toolchain noise and synthetic-file paths.
//! Ported from `original_source/errfilter.go`, extended with the extra
//! rewrite rules spec §4.5 names beyond what that snapshot implemented.

use std::io::{self, Write};

pub struct ErrFilter<W: Write> {
    inner: W,
    buf: String,
    session_file_name: String,
}

impl<W: Write> ErrFilter<W> {
    pub fn new(inner: W, session_file_name: impl Into<String>) -> Self {
        ErrFilter { inner, buf: String::new(), session_file_name: session_file_name.into() }
    }

    fn flush_line(&mut self, line: &str) -> io::Result<()> {
        if let Some(rewritten) = self.replace(line) {
            self.inner.write_all(rewritten.as_bytes())?;
        }
        Ok(())
    }

    /// Returns `None` to drop the line entirely, `Some(text)` otherwise.
    fn replace(&self, line: &str) -> Option<String> {
        if line.starts_with("# command-line-arguments") {
            return None;
        }
        if line.contains("warning: pattern \"all\" matched no module dependencies") {
            return None;
        }
        if let Some(rest) = line.strip_prefix("build command-line-arguments:") {
            return Some(rest.trim_start().to_string());
        }
        if let Some(idx) = line.find(self.session_file_name.as_str()) {
            let after = &line[idx..];
            return Some(match after.find(' ') {
                Some(space) => after[space + 1..].to_string(),
                None => after.to_string(),
            });
        }
        Some(line.to_string())
    }
}

impl<W: Write> Write for ErrFilter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(data);
        let mut rest = text.as_ref();
        while let Some(idx) = rest.find('\n') {
            if !self.buf.is_empty() {
                let pending = std::mem::take(&mut self.buf);
                self.flush_line(&pending)?;
            }
            self.flush_line(&format!("{}\n", &rest[..idx]))?;
            rest = &rest[idx + 1..];
        }
        self.buf.push_str(rest);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session_file: &str, input: &str) -> String {
        let mut out = Vec::new();
        {
            let mut filter = ErrFilter::new(&mut out, session_file);
            filter.write_all(input.as_bytes()).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn drops_command_line_arguments_banner() {
        let out = run("gore_session.go", "# command-line-arguments\nsomething else\n");
        assert_eq!(out, "something else\n");
    }

    #[test]
    fn strips_up_to_first_space_after_session_file() {
        let out = run("gore_session.go", "/tmp/xyz/gore_session.go:42:17: undefined: X\n");
        assert_eq!(out, "undefined: X\n");
    }

    #[test]
    fn drops_module_dependency_warning() {
        let out = run("gore_session.go", "go: warning: pattern \"all\" matched no module dependencies\n");
        assert_eq!(out, "");
    }

    #[test]
    fn strips_build_prefix() {
        let out = run("gore_session.go", "build command-line-arguments: some error\n");
        assert_eq!(out, "some error\n");
    }

    #[test]
    fn passes_through_unrelated_lines() {
        let out = run("gore_session.go", "ok\n");
        assert_eq!(out, "ok\n");
    }

    #[test]
    fn buffers_partial_lines_across_writes() {
        let mut out = Vec::new();
        {
            let mut filter = ErrFilter::new(&mut out, "gore_session.go");
            filter.write_all(b"undefi").unwrap();
            filter.write_all(b"ned: X\n").unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "undefined: X\n");
    }
}
