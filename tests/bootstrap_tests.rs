//! Tests for the bootstrap sequence
//!
//! These drive `Bootstrapper` with a recording runner and verify:
//! - Step order and the commands each step issues
//! - Idempotent environment creation
//! - Fail-fast propagation of a step's exit status
//! - Verification reporting

mod common;

use common::{RecordingRunner, make_fake_env};
use venv_bootstrap::packages::BASE_PACKAGES;
use venv_bootstrap::{
    BootstrapError, Bootstrapper, Configuration, HardwareVariant, Step, Verification,
};

fn config_in(dir: &std::path::Path) -> Configuration {
    Configuration {
        venv: dir.join(".venv"),
        ..Configuration::default()
    }
}

type RunResult = venv_bootstrap::error::Result<venv_bootstrap::BootstrapReport>;

fn run(config: Configuration, runner: &mut RecordingRunner) -> (RunResult, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let result = Bootstrapper::new(config, runner).run(&mut out, &mut err);
    (
        result,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

// =============================================================================
// Happy path
// =============================================================================

#[test]
fn test_clean_directory_runs_all_steps_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();

    let (result, out, err) = run(config_in(dir.path()), &mut runner);
    let report = result.unwrap();

    assert!(report.created);
    assert_eq!(
        runner.steps(),
        vec![
            Step::CreateEnvironment,
            Step::UpgradeToolchain,
            Step::InstallBase,
            Step::InstallBackend,
            Step::Verify,
        ]
    );
    assert!(out.contains("OK"));
    assert!(err.is_empty());
}

#[test]
fn test_create_uses_configured_interpreter() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();
    let config = Configuration {
        python: "python3.11".to_string(),
        ..config_in(dir.path())
    };

    run(config, &mut runner).0.unwrap();

    let create = runner.call(Step::CreateEnvironment).unwrap();
    assert_eq!(create.program, std::path::PathBuf::from("python3.11"));
    assert_eq!(create.args[..2], ["-m", "venv"]);
    assert!(create.env.is_empty(), "creation runs before activation");
}

#[test]
fn test_later_steps_use_activated_interpreter() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();

    run(config_in(dir.path()), &mut runner).0.unwrap();

    let venv_python = dir.path().join(".venv").join("bin").join("python");
    for step in [
        Step::UpgradeToolchain,
        Step::InstallBase,
        Step::InstallBackend,
        Step::Verify,
    ] {
        let call = runner.call(step).unwrap();
        assert_eq!(call.program, venv_python, "{} should use the venv python", step);
        assert!(
            call.env.iter().any(|(k, v)| k == "VIRTUAL_ENV"
                && std::path::Path::new(v) == dir.path().join(".venv")),
            "{} should see VIRTUAL_ENV",
            step
        );
    }
}

#[test]
fn test_base_packages_installed_as_one_batch() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();

    run(config_in(dir.path()), &mut runner).0.unwrap();

    // The module probe also names numpy, so only pip invocations count
    let installs: Vec<_> = runner
        .calls
        .iter()
        .filter(|c| c.step != Step::Verify && c.args.iter().any(|a| a == "numpy"))
        .collect();
    assert_eq!(installs.len(), 1);
    assert_eq!(installs[0].step, Step::InstallBase);
    assert_eq!(installs[0].args[3..], *BASE_PACKAGES);
}

#[test]
fn test_cpu_backend_targets_cpu_index() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();

    run(config_in(dir.path()), &mut runner).0.unwrap();

    let backend = runner.call(Step::InstallBackend).unwrap();
    assert_eq!(
        backend.args,
        vec![
            "-m",
            "pip",
            "install",
            "torch",
            "torchvision",
            "torchaudio",
            "--index-url",
            "https://download.pytorch.org/whl/cpu",
        ]
    );
}

#[test]
fn test_cuda_backend_targets_variant_index() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();
    let config = Configuration {
        variant: HardwareVariant::Cuda("cu121".to_string()),
        ..config_in(dir.path())
    };

    let (result, out, _) = run(config, &mut runner);
    result.unwrap();

    let backend = runner.call(Step::InstallBackend).unwrap();
    assert_eq!(
        backend.args.last().unwrap(),
        "https://download.pytorch.org/whl/cu121"
    );
    assert!(out.contains("cu121 build"));
}

#[test]
fn test_completion_line_has_activation_command() {
    let mut runner = RecordingRunner::new();
    let dir = tempfile::tempdir().unwrap();
    let config = Configuration {
        venv: dir.path().join("ml"),
        ..Configuration::default()
    };

    let (result, out, _) = run(config, &mut runner);
    result.unwrap();

    let expected = format!("source \"{}/ml/bin/activate\"", dir.path().display());
    let done = out.lines().find(|l| l.starts_with("Done.")).unwrap();
    assert!(done.contains(&expected), "got: {}", done);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_existing_environment_is_not_recreated() {
    let dir = tempfile::tempdir().unwrap();
    make_fake_env(&dir.path().join(".venv"));
    let mut runner = RecordingRunner::new();

    let (result, out, _) = run(config_in(dir.path()), &mut runner);
    let report = result.unwrap();

    assert!(!report.created);
    assert!(runner.call(Step::CreateEnvironment).is_none());
    assert!(out.contains("Using existing virtual environment"));
}

#[test]
fn test_second_run_skips_creation() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = RecordingRunner::new();
    assert!(run(config_in(dir.path()), &mut first).0.unwrap().created);

    let mut second = RecordingRunner::new();
    assert!(!run(config_in(dir.path()), &mut second).0.unwrap().created);
    assert_eq!(second.steps()[0], Step::UpgradeToolchain);
}

// =============================================================================
// Fail fast
// =============================================================================

#[test]
fn test_failed_step_aborts_with_its_status() {
    for (failing, code) in [
        (Step::CreateEnvironment, 1),
        (Step::UpgradeToolchain, 2),
        (Step::InstallBase, 3),
        (Step::InstallBackend, 4),
    ] {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = RecordingRunner::new();
        runner.fail_step = Some((failing, code));

        let (result, out, _) = run(config_in(dir.path()), &mut runner);
        let err = result.unwrap_err();

        assert!(matches!(err, BootstrapError::StepFailed { .. }));
        assert_eq!(err.exit_code(), code);
        assert_eq!(*runner.steps().last().unwrap(), failing, "nothing runs after {}", failing);
        assert!(!out.contains("Done."));
    }
}

// =============================================================================
// Verification
// =============================================================================

#[test]
fn test_missing_modules_reported_by_package_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();
    runner.missing_modules = vec!["yaml".to_string(), "torchaudio".to_string()];

    let (result, out, err) = run(config_in(dir.path()), &mut runner);
    let report = result.unwrap();

    match report.verification {
        Verification::Checked(r) => assert_eq!(r.missing, vec!["pyyaml", "torchaudio"]),
        other => panic!("expected a checked report, got {:?}", other),
    }
    assert_eq!(err, "Missing: pyyaml, torchaudio\n");
    assert!(!out.lines().any(|l| l == "OK"));
}

#[test]
fn test_failed_probe_does_not_fail_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = RecordingRunner::new();
    runner.fail_step = Some((Step::Verify, 1));

    let (result, _, err) = run(config_in(dir.path()), &mut runner);
    let report = result.unwrap();

    assert!(matches!(report.verification, Verification::Unavailable(_)));
    assert!(err.contains("verification could not run"));
}

#[test]
fn test_verify_only_runs_probe_alone() {
    let dir = tempfile::tempdir().unwrap();
    make_fake_env(&dir.path().join(".venv"));
    let mut runner = RecordingRunner::new();
    let config = Configuration {
        verify_only: true,
        ..config_in(dir.path())
    };

    let (result, out, _) = run(config, &mut runner);
    result.unwrap();

    assert_eq!(runner.steps(), vec![Step::Verify]);
    assert!(out.contains("OK"));
}
