//! Bootstrap sequence
//!
//! Drives the steps in order: create, activate, upgrade toolchain, install
//! base packages, install the numerical backend, print the activation hint,
//! verify. Any failing step aborts the run with that step's status; nothing
//! already installed is rolled back.

use std::io::Write;

use tracing::info;

use crate::config::Configuration;
use crate::environment::{Activation, VirtualEnv};
use crate::error::{BootstrapError, Result};
use crate::steps::{CreateVenvArgs, InstallBackendArgs, InstallBaseArgs, UpgradeToolchainArgs};
use crate::tool_runner::ToolRunner;
use crate::tool_traits::ToolArgs;
use crate::verify::{Verification, print_verification, verify_environment};

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// False when an existing environment was reused
    pub created: bool,
    pub verification: Verification,
}

/// Runs the bootstrap sequence for one configuration
pub struct Bootstrapper<'a> {
    config: Configuration,
    env: VirtualEnv,
    runner: &'a mut dyn ToolRunner,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(config: Configuration, runner: &'a mut dyn ToolRunner) -> Self {
        let env = VirtualEnv::new(&config.venv);
        Self {
            config,
            env,
            runner,
        }
    }

    /// Run every step, writing progress to `out` and warnings to `err`
    pub fn run(&mut self, out: &mut dyn Write, err: &mut dyn Write) -> Result<BootstrapReport> {
        // A non-UTF-8 path cannot be rendered as JSON; that must not stop the run
        let config = self
            .config
            .to_json()
            .unwrap_or_else(|e| format!("{:?} ({})", self.config, e));
        info!(%config, "bootstrap starting");

        if self.config.verify_only {
            return self.run_verify_only(out, err);
        }

        let created = self.ensure_environment(out)?;
        let activation = self.env.activate()?;

        writeln!(out, "==> Upgrading pip, setuptools and wheel")?;
        self.run_step(
            &UpgradeToolchainArgs {
                activation: activation.clone(),
            },
            out,
        )?;

        writeln!(out, "==> Installing base packages")?;
        self.run_step(
            &InstallBaseArgs {
                activation: activation.clone(),
            },
            out,
        )?;

        let variant = self.config.variant.clone();
        if variant.is_cpu() {
            writeln!(out, "==> Installing PyTorch (CPU build)")?;
        } else {
            writeln!(out, "==> Installing PyTorch ({} build)", variant)?;
        }
        self.run_step(
            &InstallBackendArgs {
                activation: activation.clone(),
                variant,
            },
            out,
        )?;

        writeln!(
            out,
            "Done. Activate the environment with: {}",
            self.env.activate_command()
        )?;

        let verification = self.verify(&activation, out, err)?;
        info!("bootstrap finished");

        Ok(BootstrapReport {
            created,
            verification,
        })
    }

    /// Create the environment unless one already exists. Returns whether a
    /// creation command was issued.
    fn ensure_environment(&mut self, out: &mut dyn Write) -> Result<bool> {
        if self.env.exists() {
            info!(venv = %self.env.root().display(), "environment exists, skipping creation");
            writeln!(
                out,
                "==> Using existing virtual environment at {}",
                self.env.root().display()
            )?;
            return Ok(false);
        }

        writeln!(
            out,
            "==> Creating virtual environment at {} with {}",
            self.env.root().display(),
            self.config.python
        )?;
        self.run_step(
            &CreateVenvArgs {
                python: self.config.python.clone(),
                venv: self.config.venv.clone(),
            },
            out,
        )?;
        Ok(true)
    }

    fn run_verify_only(
        &mut self,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<BootstrapReport> {
        if !self.env.exists() && !self.config.dry_run {
            return Err(BootstrapError::MissingEnvironment(
                self.env.root().display().to_string(),
            ));
        }
        let activation = self.env.activate()?;
        let verification = self.verify(&activation, out, err)?;
        Ok(BootstrapReport {
            created: false,
            verification,
        })
    }

    fn verify(
        &mut self,
        activation: &Activation,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Verification> {
        writeln!(out, "==> Verifying installed packages")?;
        let verification = verify_environment(&mut *self.runner, activation);
        print_verification(&verification, out, err)?;
        Ok(verification)
    }

    fn run_step(&mut self, args: &dyn ToolArgs, out: &mut dyn Write) -> Result<()> {
        let output = self.runner.run(args)?;
        if output.dry_run {
            writeln!(out, "[DRY RUN] {}", args.command_line())?;
        }
        output.ensure_success(&args.step().to_string())
    }
}
