//! Abbreviation grammar for command names, e.g. `i[mport]`, `t[ype]`
//! (spec §4.6). Ported verbatim from `original_source/command_name.go`.

/// A canonical command name, optionally carrying a single bracketed
/// abbreviable tail: `"i[mport]"` means the prefix `"i"` is mandatory and
/// any prefix of `"mport"` may follow it.
pub struct CommandName(pub &'static str);

impl CommandName {
    /// The full display name with brackets stripped, e.g. `"import"`.
    pub fn display(&self) -> String {
        self.0.replace(['[', ']'], "")
    }

    fn split(&self) -> (&str, &str) {
        match self.0.split_once('[') {
            Some((prefix, rest)) => {
                let abbr = rest.split_once(']').map(|(a, _)| a).unwrap_or(rest);
                (prefix, abbr)
            }
            None => (self.0, ""),
        }
    }

    /// `t.starts_with(prefix) && abbr.starts_with(&t[prefix.len()..])`.
    pub fn matches(&self, t: &str) -> bool {
        let (prefix, abbr) = self.split();
        match t.strip_prefix(prefix) {
            Some(rest) => abbr.starts_with(rest),
            None => false,
        }
    }

    pub fn matches_prefix(&self, t: &str) -> bool {
        self.0.starts_with(t) || self.matches(t)
    }
}
