//! Command-line flags (spec §6). Grounded on `original_source/cli.go`'s
//! flag set (`-autoimport`, `-context`, `-pkg`) plus the version/help flags
//! `original_source/main.go` wires at the `flag` package level, parsed by
//! hand in the host crate's `cli.rs` style rather than a declarative parser
//! crate.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    pub auto_import: bool,
    pub context_files: Vec<String>,
    pub package_name: Option<String>,
    pub help: bool,
    pub version: bool,
    /// Set to the offending flag when parsing hits one `flag.ContinueOnError`
    /// (the original's `flag` package mode) would have rejected. The caller
    /// must print usage to stderr and exit non-zero rather than start a
    /// session (spec §6).
    pub unknown_flag: Option<String>,
}

pub fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs::default();
    let mut i = 1; // skip program name
    while i < args.len() {
        match args[i].as_str() {
            "-autoimport" => cli.auto_import = true,
            "-context" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    cli.context_files = v.split(',').map(str::to_string).collect();
                }
            }
            "-pkg" => {
                i += 1;
                cli.package_name = args.get(i).cloned();
            }
            "-help" | "--help" | "-h" => cli.help = true,
            "-version" | "--version" | "-V" => cli.version = true,
            other => {
                cli.unknown_flag = Some(other.to_string());
                break;
            }
        }
        i += 1;
    }
    cli
}

/// Usage text for a rejected flag, printed to stderr (spec §6 "unknown
/// flag → non-zero with usage on stderr"), mirroring the Go `flag`
/// package's default `ContinueOnError` behavior of writing usage to the
/// `FlagSet`'s error output.
pub fn print_usage_to_stderr(unknown_flag: &str) {
    eprintln!("gore: unknown flag: {}", unknown_flag);
    eprintln!(
        r#"Usage of gore:
    -autoimport         formats and adjusts imports automatically
    -context <files>    import packages, functions, variables and constants from external golang source files
    -pkg <path>         the package where the session will be run inside
    -help               show this help message
    -version            show version"#
    );
}

pub fn print_help() {
    println!(
        r#"gore - A Go REPL

Version: {}

Synopsis:
    % gore

Options:
    -autoimport         formats and adjusts imports automatically
    -context <files>    import packages, functions, variables and constants from external golang source files
    -pkg <path>         the package where the session will be run inside
    -help               show this help message
    -version            show version
"#,
        VERSION
    );
}

pub fn print_version() {
    println!("gore version {}", VERSION);
}
