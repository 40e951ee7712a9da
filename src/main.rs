//! Binary entry point: a rustyline-based REPL loop wired to a `Session`.
//! Grounded on the host crate's `main.rs`/`repl.rs` readline-loop shape
//! (rustyline `Editor`, `ReadlineError::Interrupted`/`Eof` handling)
//! simplified to drop hsab's postfix-stack-specific keyboard shortcuts, and
//! on `original_source/gore.go::Run` for the eval-dispatch/sentinel
//! handling and history load/save sequence.

use std::env;
use std::process::ExitCode;

use gore::cli::{self, CliArgs};
use gore::history;
use gore::session::Session;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

fn continuation_indent(line: &str) -> usize {
    let mut depth: i32 = 0;
    for c in line.chars() {
        match c {
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            _ => {}
        }
    }
    depth.max(0) as usize
}

fn run_repl(cli: &CliArgs) -> ExitCode {
    let project_dir = env::current_dir().unwrap_or_else(|_| ".".into());
    let mut session = match Session::new(project_dir, cli.auto_import) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("gore: could not start session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for file in &cli.context_files {
        if let Err(e) = session.include_file(file) {
            eprintln!("gore: {}: {}", file, e);
        }
    }

    if let Some(pkg) = &cli.package_name {
        if let Err(e) = session.include_package(pkg) {
            eprintln!("gore: {}: {}", pkg, e);
        }
    }

    let _ = gore::signals::setup_signal_handlers();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("gore: could not start line editor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let history_file = history::history_path();
    let mut entered_lines = Vec::new();
    if let Some(path) = &history_file {
        for line in history::load(path) {
            let _ = rl.add_history_entry(&line);
            entered_lines.push(line);
        }
    }

    eprintln!("gore version {}  :help for help", cli::VERSION);

    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() {
            "gore> ".to_string()
        } else {
            format!("..... {}", "    ".repeat(continuation_indent(&pending)))
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                if pending.is_empty() && line.trim().is_empty() {
                    continue;
                }

                if !pending.is_empty() {
                    pending.push('\n');
                }
                pending.push_str(&line);

                if continuation_indent(&pending) > 0 {
                    continue;
                }

                match session.eval(&pending) {
                    Ok(()) => {
                        let _ = rl.add_history_entry(pending.as_str());
                        entered_lines.push(pending.clone());
                        pending.clear();
                    }
                    Err(gore::session::SessionError::Continue) => {
                        // keep `pending` accumulating continuation lines; not
                        // yet an accepted chunk, so no history record.
                    }
                    Err(gore::session::SessionError::Quit) => break,
                    Err(gore::session::SessionError::CmdRun) => {
                        let _ = rl.add_history_entry(pending.as_str());
                        entered_lines.push(pending.clone());
                        pending.clear();
                    }
                    Err(e) => {
                        let _ = rl.add_history_entry(pending.as_str());
                        entered_lines.push(pending.clone());
                        eprintln!("{}", e);
                        pending.clear();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                pending.clear();
                gore::signals::interrupt_foreground();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("gore: {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        if let Err(e) = history::save(path, &entered_lines) {
            eprintln!("gore: while saving history: {}", e);
        }
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = cli::parse_args(&args);

    if let Some(flag) = &cli.unknown_flag {
        cli::print_usage_to_stderr(flag);
        return ExitCode::FAILURE;
    }
    if cli.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if cli.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    run_repl(&cli)
}
