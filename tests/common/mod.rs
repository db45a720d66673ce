//! Shared test doubles for driving `Bootstrapper` without Python

#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use venv_bootstrap::error::Result;
use venv_bootstrap::{Step, ToolArgs, ToolOutput, ToolRunner, VirtualEnv};

/// One recorded tool invocation
#[derive(Debug, Clone)]
pub struct Call {
    pub step: Step,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(OsString, OsString)>,
}

/// Records invocations and fakes their effects
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<Call>,
    /// Fail this step with this exit code
    pub fail_step: Option<(Step, i32)>,
    /// Import names the probe reports as missing
    pub missing_modules: Vec<String>,
    /// Create `<venv>/bin/python` when the create step runs
    pub materialize_venv: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            materialize_venv: true,
            ..Self::default()
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls.iter().map(|c| c.step).collect()
    }

    pub fn call(&self, step: Step) -> Option<&Call> {
        self.calls.iter().find(|c| c.step == step)
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&mut self, tool: &dyn ToolArgs) -> Result<ToolOutput> {
        let call = Call {
            step: tool.step(),
            program: tool.program(),
            args: tool.to_cli_args(),
            env: tool.get_env_vars(),
        };
        self.calls.push(call.clone());

        if let Some((step, code)) = self.fail_step {
            if step == call.step {
                return Ok(ToolOutput {
                    exit_code: Some(code),
                    success: false,
                    ..ToolOutput::default()
                });
            }
        }

        if call.step == Step::CreateEnvironment && self.materialize_venv {
            if let Some(venv) = call.args.last() {
                make_fake_env(Path::new(venv));
            }
        }

        let stdout = if call.step == Step::Verify {
            let quoted: Vec<String> = self
                .missing_modules
                .iter()
                .map(|m| format!("\"{}\"", m))
                .collect();
            format!("[{}]\n", quoted.join(", "))
        } else {
            String::new()
        };

        Ok(ToolOutput {
            stdout,
            exit_code: Some(0),
            success: true,
            ..ToolOutput::default()
        })
    }
}

/// Lay out just enough of an environment for `VirtualEnv::exists`
pub fn make_fake_env(root: &Path) {
    let env = VirtualEnv::new(root);
    std::fs::create_dir_all(env.bin_dir()).expect("create bin dir");
    std::fs::write(env.python(), b"").expect("write fake interpreter");
}
