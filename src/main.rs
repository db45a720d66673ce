//! venv-bootstrap - Main entry point
//!
//! Parses the command line, installs signal handling for child cleanup and
//! runs the bootstrap sequence, exiting with the status of the first failing
//! step.

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use venv_bootstrap::cli::{self, Cli};
use venv_bootstrap::error::BootstrapError;
use venv_bootstrap::process_guard;
use venv_bootstrap::{Bootstrapper, DryRunRunner, ProcessRunner, ToolRunner};

/// Initialize logging to stderr; `RUST_LOG` overrides the default filter
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,venv_bootstrap=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help goes to stdout, parse errors to stderr
            let _ = e.print();
            std::process::exit(cli::exit_code_for(&e));
        }
    };

    init_tracing();

    if let Err(e) = process_guard::init_signal_handlers().context("installing signal handlers") {
        // Children are still reaped normally; only interrupt cleanup is lost
        warn!("{:#}", e);
    }
    debug!("signal handlers initialized");

    let config = cli.into_configuration();
    let mut process_runner = ProcessRunner::new();
    let mut dry_run_runner = DryRunRunner::new();
    let runner: &mut dyn ToolRunner = if config.dry_run {
        &mut dry_run_runner
    } else {
        &mut process_runner
    };

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let result = Bootstrapper::new(config, runner).run(&mut stdout, &mut stderr);

    if let Err(e) = result {
        error!(error = %e, "bootstrap aborted");
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &BootstrapError) -> i32 {
    match err.exit_code() {
        // A failing tool always yields a failing run
        0 => 1,
        code => code,
    }
}
