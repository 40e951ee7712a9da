//! Module Environment (spec §4.4): the on-disk scratch module the host
//! toolchain resolves the session file, extra files, and the pretty-printer
//! dependency against.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ModuleEnvError {
    #[error("could not create scratch directory: {0}")]
    ScratchDir(#[source] std::io::Error),
    #[error("could not write module descriptor: {0}")]
    WriteDescriptor(#[source] std::io::Error),
    #[error("could not list modules: {0}")]
    ListModules(#[source] std::io::Error),
    #[error("could not parse module list: {0}")]
    ParseModules(#[source] serde_json::Error),
}

/// A printer package candidate, in preference order (spec §4.4, §9
/// "pretty-printer selection"). `code_for` builds the call expression
/// `PRINT`'s body uses for one argument named `x`.
pub struct PrinterCandidate {
    pub import_path: String,
    pub pinned_version: Option<&'static str>,
    pub call: fn(&str) -> String,
}

pub fn printer_candidates() -> Vec<PrinterCandidate> {
    vec![
        PrinterCandidate {
            import_path: "github.com/k0kubun/pp/v3".into(),
            pinned_version: Some("v3.1.0"),
            call: |x| format!("pp.Println({})", x),
        },
        PrinterCandidate { import_path: "fmt".into(), pinned_version: None, call: |x| format!("fmt.Printf(\"%#v\\n\", {})", x) },
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoModule {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Dir", default)]
    pub dir: String,
    #[serde(rename = "Main", default)]
    pub main: bool,
    #[serde(rename = "Replace", default)]
    pub replace: Option<Box<GoModule>>,
}

/// Asks the toolchain (`go list -json -m all`, run from `cwd`) for the
/// user's current module graph, per `original_source/gomod.go::goListAll`.
pub fn list_local_modules(cwd: &Path) -> Result<Vec<GoModule>, ModuleEnvError> {
    let output = Command::new("go")
        .args(["list", "-json", "-m", "all"])
        .current_dir(cwd)
        .output()
        .map_err(ModuleEnvError::ListModules)?;
    let text = String::from_utf8_lossy(&output.stdout);
    let mut modules = Vec::new();
    for value in serde_json::Deserializer::from_str(&text).into_iter::<GoModule>() {
        modules.push(value.map_err(ModuleEnvError::ParseModules)?);
    }
    Ok(modules)
}

/// Builds `replace` directives for every main or already-replaced module
/// (`original_source/gomod.go::getModReplaces`), so the scratch module sees
/// the same local package versions the user's real project does.
pub fn mod_replaces(modules: &[GoModule]) -> Vec<String> {
    modules
        .iter()
        .filter(|m| m.main || m.replace.is_some())
        .map(|m| format!("replace {} => {:?}", m.path, m.dir))
        .collect()
}

pub struct ModuleEnvironment {
    pub dir: tempfile::TempDir,
    pub module_name: String,
}

impl ModuleEnvironment {
    /// Creates the scratch directory whose basename becomes the synthetic
    /// module name (spec §4.4 step 1).
    pub fn create() -> Result<Self, ModuleEnvError> {
        let dir = tempfile::Builder::new().prefix("gore-").tempdir().map_err(ModuleEnvError::ScratchDir)?;
        let module_name = dir
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gore-session".to_string());
        Ok(ModuleEnvironment { dir, module_name })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn go_mod_path(&self) -> PathBuf {
        self.dir.path().join("go.mod")
    }

    /// Writes `go.mod` (spec §4.4 step 2): a `module` line, a `require` line
    /// for every pinned printer candidate (so `Session::new`'s printer probe
    /// can actually resolve `pp/v3` instead of always falling back to `fmt`
    /// with an unrequired module), plus `replace` directives discovered by
    /// listing modules from `project_dir` (the user's real working directory
    /// when `gore` was launched).
    pub fn write_go_mod(&self, project_dir: &Path) -> Result<(), ModuleEnvError> {
        let replaces = match list_local_modules(project_dir) {
            Ok(mods) => mod_replaces(&mods),
            Err(_) => vec![], // offline or no go.mod in project_dir: scratch module stands alone
        };
        let mut content = format!("module {}\n\ngo 1.21\n", self.module_name);
        for candidate in printer_candidates() {
            if let Some(version) = candidate.pinned_version {
                content.push_str(&format!("\nrequire {} {}\n", candidate.import_path, version));
            }
        }
        for r in replaces {
            content.push_str(&r);
            content.push('\n');
        }
        std::fs::write(self.go_mod_path(), content).map_err(ModuleEnvError::WriteDescriptor)
    }
}

/// Reachability probe for `GOPROXY` with a 5-second connect timeout (spec
/// §5, §4.4 step 3). Returns `false` when the proxy is unreachable, in
/// which case the caller should fall back to the standard-library printer.
pub fn goproxy_reachable(goproxy_url: &str) -> bool {
    if goproxy_url == "off" || goproxy_url.is_empty() {
        return false;
    }
    let agent = ureq::AgentBuilder::new().timeout_connect(Duration::from_secs(5)).build();
    agent.get(goproxy_url).call().is_ok()
}
