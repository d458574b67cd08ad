//! Bounded execution of provider binaries.

use super::context::ProbeContext;
use crate::error::{GateError, Result};
use std::ffi::OsStr;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Upper bound on a single wait before cancellation is re-checked.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Pause between spawn attempts while the executable is still open for writing.
const SPAWN_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Spawn attempts before an ETXTBSY failure is reported.
const SPAWN_ATTEMPTS: u32 = 100;

/// Captured result of running a provider binary to completion.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status of the process.
    pub status: ExitStatus,

    /// Raw standard output.
    pub stdout: Vec<u8>,

    /// Standard error, lossily decoded.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,
}

impl CommandOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Owns the spawned child and its process group until the run settles.
///
/// Dropping an unsettled guard kills the whole group and reaps the child.
struct ChildGuard {
    child: Child,
    reaped: bool,
    settled: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
            settled: false,
        }
    }

    /// Kill the group, including members that outlive the direct child.
    fn kill(&mut self) {
        if self.settled {
            return;
        }
        kill_process_group(&self.child);
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
            self.reaped = true;
        }
        self.settled = true;
    }

    /// Leave the group alone; the run finished normally.
    fn settle(&mut self) {
        self.settled = true;
    }
}

/// Kill every process in the child's group, catching wrapper scripts' children.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    if let Ok(pid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: the child leads its own process group (see `run`). A group
        // id is not reused while any member is alive, and an empty group
        // makes this call fail with ESRCH.
        unsafe {
            libc::kill(-pid, libc::SIGKILL);
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Which pipe a drained buffer came from.
enum Stream {
    Stdout,
    Stderr,
}

/// Fail with the cancellation-kind error, killing the group, once `ctx` is done.
fn check_bounds(ctx: &ProbeContext, guard: &mut ChildGuard, provider: &str) -> Result<()> {
    if ctx.is_cancelled() {
        guard.kill();
        tracing::warn!("Version probe for {} cancelled, process killed", provider);
        return Err(GateError::Cancelled {
            provider: provider.to_string(),
        });
    }
    if ctx.is_expired() {
        guard.kill();
        tracing::warn!("Version probe for {} timed out, process killed", provider);
        return Err(GateError::DeadlineExceeded {
            provider: provider.to_string(),
            timeout: ctx.timeout(),
        });
    }
    Ok(())
}

fn wait_slice(ctx: &ProbeContext) -> Duration {
    ctx.remaining()
        .map_or(POLL_INTERVAL, |remaining| remaining.min(POLL_INTERVAL))
}

/// Run `program` with `args`, capturing stdout and stderr separately.
///
/// Waits until the process exits and both pipes close, the context deadline
/// passes, or the context is cancelled. In the latter two cases the child's
/// process group is killed before returning, even if the direct child has
/// already exited but left background processes holding a pipe. A non-zero
/// exit is not an error here; see [`CommandOutput::success`].
pub fn run<S: AsRef<OsStr>>(
    provider: &str,
    program: S,
    args: &[&str],
    ctx: &ProbeContext,
) -> Result<CommandOutput> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let child = spawn(&mut cmd, ctx).map_err(|e| GateError::ProcessFailed {
        provider: provider.to_string(),
        reason: format!("failed to start: {}", e),
        stderr: String::new(),
    })?;
    let mut guard = ChildGuard::new(child);

    let (tx, rx) = mpsc::channel();
    let mut open_pipes = 0;
    if let Some(stdout) = guard.child.stdout.take() {
        drain(Stream::Stdout, stdout, tx.clone());
        open_pipes += 1;
    }
    if let Some(stderr) = guard.child.stderr.take() {
        drain(Stream::Stderr, stderr, tx.clone());
        open_pipes += 1;
    }
    drop(tx);

    let status = loop {
        check_bounds(ctx, &mut guard, provider)?;

        let waited = guard
            .child
            .wait_timeout(wait_slice(ctx))
            .map_err(|e| GateError::ProcessFailed {
                provider: provider.to_string(),
                reason: format!("failed to wait for process: {}", e),
                stderr: String::new(),
            })?;
        if let Some(status) = waited {
            guard.reaped = true;
            break status;
        }
    };

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    while open_pipes > 0 {
        check_bounds(ctx, &mut guard, provider)?;

        match rx.recv_timeout(wait_slice(ctx)) {
            Ok((Stream::Stdout, buf)) => {
                stdout = buf;
                open_pipes -= 1;
            }
            Ok((Stream::Stderr, buf)) => {
                stderr = buf;
                open_pipes -= 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    guard.settle();

    Ok(CommandOutput {
        status,
        stdout,
        stderr: String::from_utf8_lossy(&stderr).to_string(),
        duration: start.elapsed(),
    })
}

/// Spawn, retrying while the executable is still open for writing elsewhere.
///
/// A binary that was just written (or is being replaced) can briefly fail
/// with ETXTBSY when another thread forked while holding it open.
fn spawn(cmd: &mut Command, ctx: &ProbeContext) -> io::Result<Child> {
    let mut attempts = 1;
    loop {
        match cmd.spawn() {
            Err(e)
                if is_text_file_busy(&e)
                    && attempts < SPAWN_ATTEMPTS
                    && !ctx.is_expired()
                    && !ctx.is_cancelled() =>
            {
                tracing::debug!("Executable busy, retrying spawn: {}", e);
                thread::sleep(SPAWN_RETRY_DELAY);
                attempts += 1;
            }
            result => return result,
        }
    }
}

#[cfg(unix)]
fn is_text_file_busy(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::ETXTBSY)
}

#[cfg(not(unix))]
fn is_text_file_busy(_e: &io::Error) -> bool {
    false
}

/// Read a pipe to the end on its own thread so the child never blocks on a full pipe.
fn drain<R: Read + Send + 'static>(stream: Stream, mut pipe: R, tx: Sender<(Stream, Vec<u8>)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, buf));
    });
}
