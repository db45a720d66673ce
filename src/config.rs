//! Bootstrap configuration
//!
//! The three user-facing options (environment path, interpreter, hardware
//! variant) plus the run-mode flags. Parsed once from the CLI and never
//! mutated afterwards.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::BootstrapError;

/// Default environment directory
pub const DEFAULT_VENV: &str = ".venv";
/// Default interpreter used to create the environment
pub const DEFAULT_PYTHON: &str = "python3";
/// Default hardware variant tag
pub const DEFAULT_VARIANT: &str = "cpu";
/// Base URL of the PyTorch wheel indexes, one per variant
pub const TORCH_INDEX_BASE: &str = "https://download.pytorch.org/whl";

/// Which prebuilt numerical backend to install
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum HardwareVariant {
    /// CPU-only build
    #[default]
    Cpu,
    /// Accelerator build identified by its tag (e.g. `cu121`)
    Cuda(String),
}

impl HardwareVariant {
    /// Tag as given on the command line (`cpu`, `cu121`, ...)
    pub fn tag(&self) -> &str {
        match self {
            Self::Cpu => DEFAULT_VARIANT,
            Self::Cuda(tag) => tag,
        }
    }

    /// Package index serving the backend build for this variant
    pub fn index_url(&self) -> String {
        format!("{}/{}", TORCH_INDEX_BASE, self.tag())
    }

    pub fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu)
    }
}

impl From<HardwareVariant> for String {
    fn from(variant: HardwareVariant) -> Self {
        variant.tag().to_string()
    }
}

impl fmt::Display for HardwareVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for HardwareVariant {
    type Err = BootstrapError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        if tag.eq_ignore_ascii_case(DEFAULT_VARIANT) {
            return Ok(Self::Cpu);
        }
        if tag.is_empty() {
            return Err(BootstrapError::config("hardware variant tag is empty"));
        }
        // The tag becomes a URL path segment
        let starts_alnum = tag.starts_with(|c: char| c.is_ascii_alphanumeric());
        if !starts_alnum || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
            return Err(BootstrapError::config(format!(
                "invalid hardware variant '{}': expected 'cpu' or a tag like 'cu121'",
                tag
            )));
        }
        Ok(Self::Cuda(tag.to_string()))
    }
}

/// Immutable run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// Target environment directory, as the user wrote it
    pub venv: PathBuf,
    /// Interpreter binary used to create the environment
    pub python: String,
    pub variant: HardwareVariant,
    /// Log planned commands instead of running them
    pub dry_run: bool,
    /// Run only the verification pass
    pub verify_only: bool,
}

impl Configuration {
    /// One-line JSON rendering for the startup log
    pub fn to_json(&self) -> Result<String, BootstrapError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            venv: PathBuf::from(DEFAULT_VENV),
            python: DEFAULT_PYTHON.to_string(),
            variant: HardwareVariant::Cpu,
            dry_run: false,
            verify_only: false,
        }
    }
}
