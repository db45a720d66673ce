//! Virtual environment layout and activation
//!
//! Activation is not applied to this process. Instead it is captured as an
//! [`Activation`] value (the environment's interpreter plus the variables an
//! `activate` script would export) and handed to every later child process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;

const BIN_DIR: &str = "bin";
const PYTHON_EXE: &str = "python";

/// Variables an activated shell never inherits
pub const UNSET_ON_ACTIVATE: &[&str] = &["PYTHONHOME"];

/// A virtual environment directory, existing or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
}

impl VirtualEnv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the interpreter and console scripts
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// The environment's own interpreter
    pub fn python(&self) -> PathBuf {
        self.bin_dir().join(PYTHON_EXE)
    }

    /// An environment exists once its interpreter does
    pub fn exists(&self) -> bool {
        self.python().exists()
    }

    /// Shell command a user runs to activate this environment
    pub fn activate_command(&self) -> String {
        format!("source \"{}\"", self.bin_dir().join("activate").display())
    }

    /// Capture activation for subsequent child processes
    ///
    /// Does not require the environment to exist yet, so dry runs can plan
    /// against a path that was never created.
    pub fn activate(&self) -> Result<Activation> {
        let root = std::path::absolute(&self.root)?;
        let bin = root.join(BIN_DIR);

        let mut search_path = vec![bin.clone()];
        if let Some(existing) = std::env::var_os("PATH") {
            search_path.extend(std::env::split_paths(&existing));
        }
        let path = std::env::join_paths(search_path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        tracing::debug!(venv = %root.display(), "activation prepared");

        Ok(Activation {
            python: bin.join(PYTHON_EXE),
            vars: vec![
                (
                    OsString::from("VIRTUAL_ENV"),
                    root.into_os_string(),
                ),
                (OsString::from("PATH"), path),
            ],
        })
    }
}

/// Interpreter and environment seen by every command after activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Absolute path of the environment's interpreter
    pub python: PathBuf,
    /// Variables to set on child processes
    pub vars: Vec<(OsString, OsString)>,
}
