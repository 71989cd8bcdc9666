//! Script child processes
//!
//! The child runs in its own process group so that quitting the app terminates the
//! script and anything it spawned. Both output streams are drained concurrently
//! into the frontend; interleaving between them is best-effort.

use super::frontend::{Frontend, OutputStream};
use crate::error::LauncherError;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// How a script run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(i32),
    Signaled(i32),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ExitOutcome::Exited(code),
            (None, Some(signal)) => ExitOutcome::Signaled(signal),
            (None, None) => ExitOutcome::Exited(1),
        }
    }

    /// Exit code the launcher propagates, shell-style for signal deaths
    pub fn exit_code(self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => code,
            ExitOutcome::Signaled(signal) => 128 + signal,
        }
    }

    pub fn success(self) -> bool {
        self == ExitOutcome::Exited(0)
    }
}

/// Signal the whole process group led by `pid`
fn kill_group(pid: u32) {
    // SAFETY: killpg only sends a signal; an invalid group is reported through errno
    let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if rc != 0 {
        debug!(pid, error = %std::io::Error::last_os_error(), "Process group already gone");
    }
}

type LineSender = mpsc::UnboundedSender<(OutputStream, String)>;
type LineReceiver = mpsc::UnboundedReceiver<(OutputStream, String)>;

fn forward_lines<R>(reader: R, stream: OutputStream, tx: LineSender)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.send((stream, line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(?stream, error = %e, "Failed to read script output");
                    break;
                }
            }
        }
    });
}

/// Run `argv` to completion with `cwd` as working directory, streaming its output to
/// `frontend`. A quit request kills the child's process group.
pub async fn run_script(
    argv: &[String],
    cwd: &Path,
    frontend: &mut dyn Frontend,
    quit: &mut watch::Receiver<bool>,
) -> Result<ExitOutcome, LauncherError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| LauncherError::Spawn("empty argument vector".to_string()))?;

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LauncherError::InterpreterNotFound(program.into()),
            _ => LauncherError::Spawn(format!("{}: {}", program, e)),
        })?;
    let pid = child.id();
    debug!(?pid, program = %program, "Script started");

    let (tx, rx) = mpsc::unbounded_channel();
    if let Some(stdout) = child.stdout.take() {
        forward_lines(stdout, OutputStream::Stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        forward_lines(stderr, OutputStream::Stderr, tx);
    } else {
        drop(tx);
    }

    match supervise(&mut child, pid, rx, frontend, quit).await {
        Ok((outcome, killed)) => {
            debug!(?outcome, killed, "Script finished");
            Ok(outcome)
        }
        Err(err) => {
            // the group may hold background jobs the direct child never waited for
            if let Some(pid) = pid {
                kill_group(pid);
            }
            if let Err(e) = child.wait().await {
                warn!(error = %e, "Failed to reap script");
            }
            Err(err)
        }
    }
}

/// Forward output and wait for exit, killing the group on quit. Returns the outcome
/// and whether the group was killed.
async fn supervise(
    child: &mut Child,
    pid: Option<u32>,
    mut rx: LineReceiver,
    frontend: &mut dyn Frontend,
    quit: &mut watch::Receiver<bool>,
) -> Result<(ExitOutcome, bool), LauncherError> {
    let mut status = None;
    let mut output_open = true;
    let mut watching = true;
    let mut killed = false;

    if *quit.borrow() {
        if let Some(pid) = pid {
            kill_group(pid);
        }
        killed = true;
    }

    while status.is_none() || output_open {
        tokio::select! {
            line = rx.recv(), if output_open => match line {
                Some((stream, line)) => frontend.output_line(stream, &line)?,
                None => output_open = false,
            },
            result = child.wait(), if status.is_none() => {
                status = Some(result?);
            }
            changed = quit.changed(), if watching && !killed => match changed {
                Ok(()) if *quit.borrow_and_update() => {
                    if let Some(pid) = pid {
                        kill_group(pid);
                    }
                    killed = true;
                }
                Ok(()) => {}
                Err(_) => watching = false,
            },
        }
    }

    let status = match status {
        Some(status) => status,
        None => child.wait().await?,
    };
    Ok((ExitOutcome::from_status(status), killed))
}
