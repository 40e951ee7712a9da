//! Completion Provider (spec §4.7): command-track completion (reused from
//! `commands.rs`) and code-track completion via `gopls`, synchronized with
//! the minimal diff algorithm ported from `original_source/gopls.go::diffString`.

use serde_json::{json, Value};

use crate::command_name::CommandName;
use crate::lsp::{LspClient, LspError};

/// Finds the shortest edit `(i, j, k)` such that `s[:i] == t[:i]`,
/// `s[j:] == t[k:]`, and (per spec §8's diff-algorithm laws) either
/// `i == j` (a pure insertion) or `s[i:j] != t[i:k]`. Chunk-scans `s` on
/// `{`, ` `, `;`, `\n` boundaries rather than computing a minimal diff.
pub fn diff_string(s: &str, t: &str) -> (usize, usize, usize) {
    let mut i = 0usize;
    let mut j = 0usize;
    let mut s = s;
    let mut t_remaining = t;
    while !s.is_empty() {
        let (u, rest) = match s.find(['{', ' ', ';', '\n']) {
            Some(l) => (&s[..=l], &s[l + 1..]),
            None => (s, ""),
        };
        s = rest;
        match t_remaining.find(u) {
            Some(l) if l > 0 && u.len() > 2 => return (i, j, i + l),
            Some(0) => {
                if i != j {
                    return (i, j, i);
                }
                i += u.len();
                j = i;
                t_remaining = &t_remaining[u.len()..];
            }
            _ => {
                j += u.len();
            }
        }
    }
    (i, j, i + t_remaining.len())
}

/// Converts a byte offset into `source` to an LSP `{line, character}`
/// position (UTF-16 code units are not modeled; the engine only deals with
/// ASCII Go source).
pub fn byte_to_position(source: &str, pos: usize) -> Value {
    let before = &source[..pos];
    let line = before.matches('\n').count();
    let char = match before.rfind('\n') {
        Some(idx) => pos - idx - 1,
        None => pos,
    };
    json!({"line": line, "character": char})
}

/// Command-track completion: `line` starts with `:`. Returns `(prefix,
/// candidates, suffix)` mirroring `original_source/complete.go::completeWord`'s
/// three-part contract.
pub fn complete_command(line: &str, pos: usize, command_names: &[CommandName]) -> (String, Vec<String>, String) {
    let head = &line[..pos];
    if !head.contains(' ') {
        let (pre, post) = (head, &line[pos..]);
        let mut result = Vec::new();
        for c in command_names {
            let name = format!(":{}", c.display());
            if name.starts_with(pre) {
                result.push(name);
            }
        }
        return (String::new(), result, post.to_string());
    }
    (String::new(), Vec::new(), String::new())
}

/// Code-track completion against a live `gopls` connection (spec §4.7): the
/// "dirty-insertion" trick splices the in-progress `line` into the session
/// source just before the closing brace of `main`, so `gopls` sees a
/// syntactically plausible program to complete inside. `expr_mode` mirrors
/// `original_source/gopls.go::complete`'s `exprMode`: when set, method and
/// function candidates get a trailing `(` so accepting one leaves the
/// cursor ready for arguments.
pub fn complete_code(
    client: &mut LspClient,
    file_uri: &str,
    known_source: &mut String,
    session_source: &str,
    line: &str,
    pos_in_line: usize,
    expr_mode: bool,
) -> Result<(Vec<String>, usize), LspError> {
    let close_brace = session_source.rfind('}').unwrap_or(session_source.len());
    let edit_source = format!("{}{}{}", &session_source[..close_brace], line, &session_source[close_brace..]);
    let mut pos = close_brace + pos_in_line;

    sync_document(client, file_uri, known_source, &edit_source)?;

    let completion_params = json!({
        "textDocument": {"uri": file_uri},
        "position": byte_to_position(&edit_source, pos),
        "context": {"triggerKind": 1},
    });
    let result = client.call("textDocument/completion", completion_params)?;
    let items = result
        .get("items")
        .or_else(|| if result.is_array() { Some(&result) } else { None })
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(build_candidates(&items, expr_mode, pos, &edit_source))
}

/// Filters noise out of `items`, appends `(` to method/function labels in
/// `expr_mode`, and tracks the byte offset of the last surviving item's
/// `textEdit.range.start` — `original_source/gopls.go::complete`'s
/// `pos = fromPos(source, item.TextEdit.Range.Start)`, run once per
/// surviving item rather than once overall.
fn build_candidates(items: &[Value], expr_mode: bool, mut pos: usize, edit_source: &str) -> (Vec<String>, usize) {
    const METHOD: u64 = 2;
    const FUNCTION: u64 = 3;

    let mut candidates = Vec::new();
    for item in items {
        let Some(label) = item.get("label").and_then(Value::as_str) else { continue };
        let kind = item.get("kind").and_then(Value::as_u64);
        if is_noise_candidate(label, kind) {
            continue;
        }
        let mut label = label.to_string();
        if expr_mode && matches!(kind, Some(METHOD) | Some(FUNCTION)) {
            label.push('(');
        }
        candidates.push(label);
        if let Some(start) = item.get("textEdit").and_then(|e| e.get("range")).and_then(|r| r.get("start")) {
            pos = position_to_byte(edit_source, start);
        }
    }
    (candidates, pos)
}

/// Inverse of `byte_to_position`: converts an LSP `{line, character}`
/// position back to a byte offset into `source`.
fn position_to_byte(source: &str, position: &Value) -> usize {
    let target_line = position.get("line").and_then(Value::as_u64).unwrap_or(0) as usize;
    let character = position.get("character").and_then(Value::as_u64).unwrap_or(0) as usize;
    let mut offset = 0usize;
    for (i, l) in source.split('\n').enumerate() {
        if i == target_line {
            return offset + character;
        }
        offset += l.len() + 1;
    }
    offset + character
}

/// Filters out completions spec §4.7 says to hide: the printer helper
/// itself, its package qualifier, and any of its methods.
fn is_noise_candidate(label: &str, kind: Option<u64>) -> bool {
    const KEYWORD: u64 = 14;
    const FUNCTION: u64 = 3;
    const MODULE: u64 = 9;
    (kind == Some(KEYWORD))
        || (kind == Some(FUNCTION) && label == crate::ast::PRINT_NAME)
        || (kind == Some(MODULE) && label == "pp")
        || label.starts_with("pp.")
}

/// Sends `textDocument/didChange` calls until `known_source` matches
/// `target`, using `diff_string` to compute each incremental edit — the
/// loop structure of `original_source/gopls.go::update`.
fn sync_document(client: &mut LspClient, file_uri: &str, known_source: &mut String, target: &str) -> Result<(), LspError> {
    while known_source != target {
        let (i, j, k) = diff_string(known_source, target);
        let params = json!({
            "textDocument": {"uri": file_uri},
            "contentChanges": [{
                "range": {
                    "start": byte_to_position(known_source, i),
                    "end": byte_to_position(known_source, j),
                },
                "text": &target[i..k],
            }],
        });
        client.notify("textDocument/didChange", params)?;
        *known_source = format!("{}{}", &target[..k], &known_source[j..]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_satisfies_prefix_suffix_laws_on_insertion() {
        let s = "func main() {\n}\n";
        let t = "func main() {\nx := 1\n}\n";
        let (i, j, k) = diff_string(s, t);
        assert_eq!(&s[..i], &t[..i]);
        assert_eq!(&s[j..], &t[k..]);
        assert!(i == j || s[i..j] != t[i..k]);
    }

    #[test]
    fn diff_laws_hold_on_prefix_and_suffix() {
        let s = "package main\nfunc main() {\nfoo()\n}\n";
        let t = "package main\nfunc main() {\nbar()\n}\n";
        let (i, j, k) = diff_string(s, t);
        assert_eq!(&s[..i], &t[..i]);
        assert_eq!(&s[j..], &t[k..]);
        assert!(i == j || s[i..j] != t[i..k]);
    }

    #[test]
    fn byte_to_position_counts_lines_and_column() {
        let pos = byte_to_position("ab\ncd", 4);
        assert_eq!(pos["line"], 1);
        assert_eq!(pos["character"], 1);
    }

    #[test]
    fn printer_helper_candidates_are_filtered() {
        assert!(is_noise_candidate("PRINT", Some(3)));
        assert!(is_noise_candidate("pp", Some(9)));
        assert!(is_noise_candidate("pp.Println", Some(6)));
        assert!(!is_noise_candidate("strings", Some(9)));
    }

    #[test]
    fn command_completion_lists_prefix_matches() {
        let names = [CommandName("i[mport]"), CommandName("print"), CommandName("q[uit]")];
        let (_, result, _) = complete_command(":p", 2, &names);
        assert_eq!(result, vec![":print".to_string()]);
    }

    #[test]
    fn position_to_byte_is_the_inverse_of_byte_to_position() {
        let source = "ab\ncd\nef";
        for pos in 0..source.len() {
            let roundtrip = position_to_byte(source, &byte_to_position(source, pos));
            assert_eq!(roundtrip, pos);
        }
    }

    #[test]
    fn expr_mode_appends_paren_to_methods_and_functions() {
        let items = vec![
            json!({"label": "Foo", "kind": 3}),
            json!({"label": "Bar", "kind": 2}),
            json!({"label": "Baz", "kind": 6}),
        ];
        let (candidates, _) = build_candidates(&items, true, 0, "");
        assert_eq!(candidates, vec!["Foo(".to_string(), "Bar(".to_string(), "Baz".to_string()]);
    }

    #[test]
    fn non_expr_mode_leaves_labels_bare() {
        let items = vec![json!({"label": "Foo", "kind": 3})];
        let (candidates, _) = build_candidates(&items, false, 0, "");
        assert_eq!(candidates, vec!["Foo".to_string()]);
    }

    #[test]
    fn position_tracks_last_surviving_items_text_edit_start() {
        let source = "line0\nline1\nline2";
        let items = vec![
            json!({"label": "A", "kind": 6, "textEdit": {"range": {"start": {"line": 1, "character": 2}}}}),
            json!({"label": "B", "kind": 6, "textEdit": {"range": {"start": {"line": 2, "character": 1}}}}),
        ];
        let (_, pos) = build_candidates(&items, false, 0, source);
        assert_eq!(pos, position_to_byte(source, &json!({"line": 2, "character": 1})));
    }
}
