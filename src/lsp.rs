//! Minimal JSON-RPC-over-stdio client for `gopls`, just enough of the
//! Language Server Protocol for code completion (spec §4.7). Grounded on
//! `original_source/gopls.go`'s `goplsCompleter`, reimplemented without the
//! `go.lsp.dev` packages (no Rust equivalent in the corpus) — hand-rolled
//! Content-Length framing over `serde_json::Value`, in the same spirit as
//! the host crate's own process-piping code.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum LspError {
    #[error("could not spawn gopls: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("i/o error talking to gopls: {0}")]
    Io(#[source] std::io::Error),
    #[error("gopls response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("gopls returned an error response: {0}")]
    Remote(String),
    #[error("gopls connection closed")]
    Closed,
}

pub struct LspClient {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    next_id: u64,
}

impl LspClient {
    pub fn spawn() -> Result<Self, LspError> {
        let mut child = Command::new("gopls")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(LspError::Spawn)?;
        let stdin = child.stdin.take().expect("stdin piped");
        let stdout = child.stdout.take().expect("stdout piped");
        Ok(LspClient { child, stdin, reader: BufReader::new(stdout), next_id: 1 })
    }

    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn write_message(&mut self, value: &Value) -> Result<(), LspError> {
        let body = serde_json::to_vec(value)?;
        write!(self.stdin, "Content-Length: {}\r\n\r\n", body.len()).map_err(LspError::Io)?;
        self.stdin.write_all(&body).map_err(LspError::Io)?;
        self.stdin.flush().map_err(LspError::Io)
    }

    fn read_message(&mut self) -> Result<Value, LspError> {
        let mut content_length: Option<usize> = None;
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line).map_err(LspError::Io)? == 0 {
                return Err(LspError::Closed);
            }
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                break;
            }
            if let Some(v) = trimmed.strip_prefix("Content-Length:") {
                content_length = v.trim().parse().ok();
            }
        }
        let len = content_length.ok_or(LspError::Closed)?;
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf).map_err(LspError::Io)?;
        Ok(serde_json::from_slice(&buf)?)
    }

    /// Sends a request and blocks for the matching response, skipping any
    /// server-initiated notifications in between (the completer never needs
    /// to act on them).
    pub fn call(&mut self, method: &str, params: Value) -> Result<Value, LspError> {
        let id = self.next_id;
        self.next_id += 1;
        self.write_message(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))?;
        loop {
            let msg = self.read_message()?;
            if msg.get("id").and_then(Value::as_u64) == Some(id) {
                if let Some(err) = msg.get("error") {
                    return Err(LspError::Remote(err.to_string()));
                }
                return Ok(msg.get("result").cloned().unwrap_or(Value::Null));
            }
        }
    }

    pub fn notify(&mut self, method: &str, params: Value) -> Result<(), LspError> {
        self.write_message(&json!({"jsonrpc": "2.0", "method": method, "params": params}))
    }

    pub fn shutdown(mut self) -> Result<(), LspError> {
        let _ = self.call("shutdown", Value::Null);
        let _ = self.notify("exit", Value::Null);
        let _ = self.child.wait();
        Ok(())
    }
}
