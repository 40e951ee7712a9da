//! Ambient diagnostics: a `debugf`-equivalent gated on `GORE_DEBUG`, ported
//! from `original_source/main.go`'s `debugf`/`errorf` helpers. Logging
//! itself is explicitly out of scope (spec §1); this is the thin local
//! stand-in the core needs to report its own recoverable conditions.

use std::sync::OnceLock;

fn debug_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("GORE_DEBUG").is_some_and(|v| !v.is_empty()))
}

pub fn debugf(args: std::fmt::Arguments<'_>) {
    if debug_enabled() {
        eprintln!("[gore] {}", args);
    }
}

#[macro_export]
macro_rules! debugf {
    ($($arg:tt)*) => {
        $crate::diag::debugf(format_args!($($arg)*))
    };
}
