//! Process lifecycle management for child tools
//!
//! pip and venv are spawned in their own process group and tracked while
//! they run. If the bootstrapper is interrupted (SIGINT, SIGTERM, SIGHUP) the
//! whole group of each tracked child is terminated, so an aborted run never
//! leaves a pip download going in the background.
//!
//! Children get SIGTERM first and a grace period before SIGKILL.

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

static CHILD_REGISTRY: OnceLock<Arc<Mutex<ChildRegistry>>> = OnceLock::new();

/// Grace period between SIGTERM and SIGKILL when a signal arrives
pub const SIGNAL_GRACE_PERIOD: Duration = Duration::from_secs(3);

/// Registry tracking running child processes
#[derive(Debug, Default)]
pub struct ChildRegistry {
    pids: HashSet<u32>,
    /// Set once termination started; later calls are no-ops
    cleanup_initiated: bool,
}

impl ChildRegistry {
    /// Get or create the global child registry
    pub fn global() -> Arc<Mutex<ChildRegistry>> {
        CHILD_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(ChildRegistry::default())))
            .clone()
    }

    pub fn register(&mut self, pid: u32) {
        self.pids.insert(pid);
        tracing::debug!(pid, "registered child process");
    }

    pub fn unregister(&mut self, pid: u32) {
        self.pids.remove(&pid);
        tracing::debug!(pid, "unregistered child process");
    }

    pub fn count(&self) -> usize {
        self.pids.len()
    }

    /// Terminate all tracked child process groups
    pub fn terminate_all(&mut self, grace_period: Duration) {
        if self.cleanup_initiated {
            return;
        }
        self.cleanup_initiated = true;

        if self.pids.is_empty() {
            return;
        }

        tracing::info!(count = self.pids.len(), "terminating child processes");

        let targets: Vec<u32> = self.pids.iter().copied().collect();
        for &pid in &targets {
            if let Err(e) = send_signal_to_group(pid, Signal::SIGTERM) {
                tracing::warn!(pid, error = %e, "group SIGTERM failed, signalling process");
                let _ = send_signal(pid, Signal::SIGTERM);
            }
        }

        let start = Instant::now();
        while start.elapsed() < grace_period {
            if targets.iter().all(|&pid| !is_process_alive(pid)) {
                tracing::info!("child processes exited");
                self.pids.clear();
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        for &pid in &targets {
            if is_process_alive(pid) {
                tracing::warn!(pid, "child ignored SIGTERM, sending SIGKILL");
                if send_signal_to_group(pid, Signal::SIGKILL).is_err() {
                    let _ = send_signal(pid, Signal::SIGKILL);
                }
            }
        }

        self.pids.clear();
    }
}

fn send_signal(pid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(pid as i32), signal)
}

/// Negative PID addresses the whole group, reaching pip's own subprocesses
fn send_signal_to_group(pgid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(-(pgid as i32)), signal)
}

/// Alive means it exists and is not a zombie
fn is_process_alive(pid: u32) -> bool {
    if signal::kill(Pid::from_raw(pid as i32), None).is_err() {
        return false;
    }

    // Field 3 of /proc/<pid>/stat is the state letter
    if let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        let fields: Vec<&str> = stat.split_whitespace().collect();
        if fields.len() > 2 {
            return !matches!(fields[2], "Z" | "X");
        }
    }

    true
}

/// Install handlers for SIGINT, SIGTERM and SIGHUP.
///
/// On delivery, running children are terminated and the process exits with
/// 128 + the signal number, the status a shell reports for the same signal.
pub fn init_signal_handlers() -> std::io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            tracing::info!(signal = sig, "interrupted, stopping child processes");

            if let Ok(mut registry) = ChildRegistry::global().lock() {
                registry.terminate_all(SIGNAL_GRACE_PERIOD);
            }

            std::process::exit(128 + sig);
        }
    });

    Ok(())
}

/// Child dies with us even if we are SIGKILLed
#[cfg(target_os = "linux")]
fn set_parent_death_signal() -> std::io::Result<()> {
    // SAFETY: prctl with PR_SET_PDEATHSIG takes no pointers
    if unsafe { nix::libc::prctl(nix::libc::PR_SET_PDEATHSIG, nix::libc::SIGTERM) } == -1 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn set_parent_death_signal() -> std::io::Result<()> {
    Ok(())
}

/// Extension trait for `std::process::Command` to set up process groups
pub trait CommandProcessGroup {
    /// Run the command as leader of a new process group
    fn in_new_process_group(&mut self) -> &mut Self;
}

impl CommandProcessGroup for std::process::Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;

        // SAFETY: the closure only calls async-signal-safe functions
        // (setpgid, prctl) between fork and exec.
        unsafe {
            self.pre_exec(|| {
                nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                    .map_err(std::io::Error::other)?;

                set_parent_death_signal()
            });
        }
        self
    }
}
