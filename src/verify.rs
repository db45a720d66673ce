//! Post-install sanity check
//!
//! Asks the environment's interpreter to locate every module in the
//! verification set and reports the packages whose module cannot be found.
//! The outcome is informational: neither a shortfall nor a probe that fails
//! to run changes the exit status of a bootstrap run.

use std::io::Write;

use crate::environment::Activation;
use crate::error::Result;
use crate::packages::{VERIFICATION_SET, package_for_module};
use crate::steps::ProbeModulesArgs;
use crate::tool_runner::ToolRunner;

/// Packages whose import name could not be located
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub missing: Vec<String>,
}

impl VerificationReport {
    /// Returns true if every package was located
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Outcome of the verification pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Checked(VerificationReport),
    /// Dry run: nothing was installed, nothing to check
    Skipped,
    /// The probe itself failed; carries the reason
    Unavailable(String),
}

/// Decode the probe's last stdout line (a JSON list of import names) into
/// package names, preserving verification-set order.
pub fn parse_probe_output(stdout: &str) -> Result<VerificationReport> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("[]");
    let modules: Vec<String> = serde_json::from_str(line.trim())?;

    let missing = modules
        .iter()
        .map(|m| package_for_module(m).map_or_else(|| m.clone(), str::to_string))
        .collect();

    Ok(VerificationReport { missing })
}

/// Run the module probe inside the activated environment
pub fn verify_environment(
    runner: &mut dyn ToolRunner,
    activation: &Activation,
) -> Verification {
    let args = ProbeModulesArgs {
        activation: activation.clone(),
        modules: VERIFICATION_SET
            .iter()
            .map(|(_, module)| module.to_string())
            .collect(),
    };

    let output = match runner.run(&args) {
        Ok(output) => output,
        Err(e) => return Verification::Unavailable(e.to_string()),
    };

    if output.dry_run {
        return Verification::Skipped;
    }
    if !output.success {
        return Verification::Unavailable(format!(
            "module probe exited with status {}: {}",
            output.status_code(),
            output.stderr.trim()
        ));
    }

    match parse_probe_output(&output.stdout) {
        Ok(report) => Verification::Checked(report),
        Err(e) => Verification::Unavailable(e.to_string()),
    }
}

/// Print the verification outcome: `OK` on `out`, anything else on `err`
pub fn print_verification(
    verification: &Verification,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> std::io::Result<()> {
    match verification {
        Verification::Checked(report) if report.is_ok() => {
            tracing::info!("all packages located");
            writeln!(out, "OK")
        }
        Verification::Checked(report) => {
            tracing::warn!(missing = ?report.missing, "packages missing after install");
            writeln!(err, "Missing: {}", report.missing.join(", "))
        }
        Verification::Skipped => writeln!(out, "[DRY RUN] Skipped verification"),
        Verification::Unavailable(reason) => {
            tracing::warn!(%reason, "verification could not run");
            writeln!(err, "Warning: verification could not run: {}", reason)
        }
    }
}
