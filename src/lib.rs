//! venv-bootstrap library
//!
//! Creates a Python virtual environment, installs a fixed data-science stack
//! plus a hardware-specific PyTorch build into it, and verifies the result.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod packages;
pub mod process_guard;
pub mod steps;
pub mod tool_runner;
pub mod tool_traits;
pub mod verify;

pub use bootstrap::{BootstrapReport, Bootstrapper};
pub use config::{Configuration, HardwareVariant};
pub use environment::{Activation, VirtualEnv};
pub use error::BootstrapError;
pub use process_guard::{ChildRegistry, CommandProcessGroup};
pub use tool_runner::{DryRunRunner, ProcessRunner, ToolOutput, ToolRunner};
pub use tool_traits::{Step, ToolArgs};
pub use verify::{Verification, VerificationReport};
