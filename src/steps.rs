//! Type-safe arguments for each bootstrap step.
//!
//! - `CreateVenvArgs` for `<python> -m venv <path>`
//! - `UpgradeToolchainArgs` for `pip install --upgrade pip setuptools wheel`
//! - `InstallBaseArgs` for the fixed base package batch
//! - `InstallBackendArgs` for torch and companions from the variant index
//! - `ProbeModulesArgs` for the post-install module probe

use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::HardwareVariant;
use crate::environment::{Activation, UNSET_ON_ACTIVATE};
use crate::packages::{BACKEND_PACKAGES, BASE_PACKAGES, TOOLCHAIN_PACKAGES};
use crate::tool_traits::{Step, ToolArgs};

fn pip_install(extra: &[&str]) -> Vec<String> {
    let mut args = vec!["-m".to_string(), "pip".to_string(), "install".to_string()];
    args.extend(extra.iter().map(|s| s.to_string()));
    args
}

// ============================================================================
// Create Environment
// ============================================================================

/// Runs before activation, so it uses the configured interpreter and the
/// caller's own environment.
#[derive(Debug, Clone)]
pub struct CreateVenvArgs {
    /// Interpreter binary name or path (e.g. `python3`).
    pub python: String,
    /// Environment directory to create.
    pub venv: PathBuf,
}

impl ToolArgs for CreateVenvArgs {
    fn program(&self) -> PathBuf {
        PathBuf::from(&self.python)
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-m".to_string(),
            "venv".to_string(),
            self.venv.display().to_string(),
        ]
    }

    fn get_env_vars(&self) -> Vec<(OsString, OsString)> {
        vec![]
    }

    fn step(&self) -> Step {
        Step::CreateEnvironment
    }
}

// ============================================================================
// Upgrade Toolchain
// ============================================================================

#[derive(Debug, Clone)]
pub struct UpgradeToolchainArgs {
    pub activation: Activation,
}

impl ToolArgs for UpgradeToolchainArgs {
    fn program(&self) -> PathBuf {
        self.activation.python.clone()
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = pip_install(&["--upgrade"]);
        args.extend(TOOLCHAIN_PACKAGES.iter().map(|s| s.to_string()));
        args
    }

    fn get_env_vars(&self) -> Vec<(OsString, OsString)> {
        self.activation.vars.clone()
    }

    fn removed_env_vars(&self) -> Vec<&'static str> {
        UNSET_ON_ACTIVATE.to_vec()
    }

    fn step(&self) -> Step {
        Step::UpgradeToolchain
    }
}

// ============================================================================
// Install Base Packages
// ============================================================================

#[derive(Debug, Clone)]
pub struct InstallBaseArgs {
    pub activation: Activation,
}

impl ToolArgs for InstallBaseArgs {
    fn program(&self) -> PathBuf {
        self.activation.python.clone()
    }

    fn to_cli_args(&self) -> Vec<String> {
        pip_install(BASE_PACKAGES)
    }

    fn get_env_vars(&self) -> Vec<(OsString, OsString)> {
        self.activation.vars.clone()
    }

    fn removed_env_vars(&self) -> Vec<&'static str> {
        UNSET_ON_ACTIVATE.to_vec()
    }

    fn step(&self) -> Step {
        Step::InstallBase
    }
}

// ============================================================================
// Install Numerical Backend
// ============================================================================

#[derive(Debug, Clone)]
pub struct InstallBackendArgs {
    pub activation: Activation,
    /// Selects the package index (`.../whl/cpu`, `.../whl/cu121`, ...).
    pub variant: HardwareVariant,
}

impl ToolArgs for InstallBackendArgs {
    fn program(&self) -> PathBuf {
        self.activation.python.clone()
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = pip_install(BACKEND_PACKAGES);
        args.push("--index-url".to_string());
        args.push(self.variant.index_url());
        args
    }

    fn get_env_vars(&self) -> Vec<(OsString, OsString)> {
        self.activation.vars.clone()
    }

    fn removed_env_vars(&self) -> Vec<&'static str> {
        UNSET_ON_ACTIVATE.to_vec()
    }

    fn step(&self) -> Step {
        Step::InstallBackend
    }
}

// ============================================================================
// Probe Modules
// ============================================================================

/// Locates each module without importing it and prints the missing ones as
/// a JSON list on the last line of stdout.
pub const PROBE_SCRIPT: &str = r#"import importlib.util, json, sys
missing = []
for name in sys.argv[1:]:
    try:
        found = importlib.util.find_spec(name) is not None
    except (ImportError, ValueError):
        found = False
    if not found:
        missing.append(name)
print(json.dumps(missing))
"#;

#[derive(Debug, Clone)]
pub struct ProbeModulesArgs {
    pub activation: Activation,
    /// Import names to locate, in report order.
    pub modules: Vec<String>,
}

impl ToolArgs for ProbeModulesArgs {
    fn program(&self) -> PathBuf {
        self.activation.python.clone()
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["-c".to_string(), PROBE_SCRIPT.to_string()];
        args.extend(self.modules.iter().cloned());
        args
    }

    fn get_env_vars(&self) -> Vec<(OsString, OsString)> {
        self.activation.vars.clone()
    }

    fn removed_env_vars(&self) -> Vec<&'static str> {
        UNSET_ON_ACTIVATE.to_vec()
    }

    fn step(&self) -> Step {
        Step::Verify
    }

    fn captures_output(&self) -> bool {
        true
    }

    fn command_line(&self) -> String {
        // The inline script is noise in logs
        format!(
            "{} -c <find_spec probe> {}",
            self.program().display(),
            self.modules.join(" ")
        )
    }
}
