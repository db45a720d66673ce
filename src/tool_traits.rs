//! Type-safe tool invocation contracts.
//!
//! Each bootstrap step that shells out to the interpreter or pip describes
//! its command line through the [`ToolArgs`] trait instead of a raw string
//! vector. The struct definition is the contract: argument order, injected
//! environment and whether output is captured are all fixed by the type.

use std::ffi::OsString;
use std::path::PathBuf;

use strum::{Display, EnumIter};

/// The externally visible steps of a bootstrap run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Step {
    #[strum(serialize = "Create environment")]
    CreateEnvironment,
    #[strum(serialize = "Upgrade packaging toolchain")]
    UpgradeToolchain,
    #[strum(serialize = "Install base packages")]
    InstallBase,
    #[strum(serialize = "Install numerical backend")]
    InstallBackend,
    #[strum(serialize = "Verify installation")]
    Verify,
}

/// Trait for typed tool arguments.
///
/// # Contract
///
/// - `program()`: interpreter to launch. A bare name is resolved on `PATH`.
/// - `to_cli_args()`: arguments exactly as the tool expects them.
/// - `get_env_vars()`: variables set on the child (activation).
/// - `removed_env_vars()`: variables removed from the child.
/// - `step()`: which bootstrap step this invocation belongs to.
/// - `captures_output()`: whether stdout/stderr are collected instead of
///   streamed to the user's terminal.
///
/// # Example
///
/// ```ignore
/// use venv_bootstrap::steps::CreateVenvArgs;
/// use venv_bootstrap::tool_traits::ToolArgs;
///
/// let args = CreateVenvArgs {
///     python: "python3".to_string(),
///     venv: PathBuf::from(".venv"),
/// };
///
/// let cli_args = args.to_cli_args(); // ["-m", "venv", ".venv"]
/// ```
pub trait ToolArgs {
    fn program(&self) -> PathBuf;

    fn to_cli_args(&self) -> Vec<String>;

    fn get_env_vars(&self) -> Vec<(OsString, OsString)>;

    fn removed_env_vars(&self) -> Vec<&'static str> {
        vec![]
    }

    fn step(&self) -> Step;

    fn captures_output(&self) -> bool {
        false
    }

    /// Human-readable command line, for logs and dry runs
    fn command_line(&self) -> String {
        let mut parts = vec![self.program().display().to_string()];
        parts.extend(self.to_cli_args());
        parts.join(" ")
    }
}
