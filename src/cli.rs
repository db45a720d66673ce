use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;

use crate::config::{Configuration, DEFAULT_PYTHON, DEFAULT_VENV, HardwareVariant};
use crate::error::EXIT_CONFIG;

/// venv-bootstrap - create a Python virtual environment with a
/// data-science and PyTorch stack
#[derive(Parser, Debug)]
#[command(name = "venv-bootstrap")]
#[command(about = "Create a Python virtual environment and install a data-science + PyTorch stack")]
#[command(version)]
pub struct Cli {
    /// Target environment directory
    #[arg(long, value_name = "PATH", default_value = DEFAULT_VENV)]
    pub venv: PathBuf,

    /// Interpreter used to create the environment
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PYTHON)]
    pub python: String,

    /// Hardware variant of the PyTorch build: `cpu` or a CUDA tag like `cu121`
    #[arg(long = "cuda", value_name = "TAG", default_value = "cpu")]
    pub variant: HardwareVariant,

    /// Print every command that would run without running any of them
    #[arg(long)]
    pub dry_run: bool,

    /// Only run the post-install verification against an existing environment
    #[arg(long)]
    pub verify_only: bool,
}

impl Cli {
    pub fn into_configuration(self) -> Configuration {
        Configuration {
            venv: self.venv,
            python: self.python,
            variant: self.variant,
            dry_run: self.dry_run,
            verify_only: self.verify_only,
        }
    }
}

/// Exit status for a parse outcome clap reports as an error.
///
/// Help and version requests succeed; every real parse error is a
/// configuration error with status 1 (clap's own default is 2).
pub fn exit_code_for(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_CONFIG,
    }
}
