//! Bounded execution of external tools.
//!
//! Inspection and signing both shell out. A hung child would otherwise block
//! a distribution's pipeline forever, so every call carries a timeout and an
//! expired child is killed and reaped.

use std::io::{self, Read};
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Result of running a command with a deadline
#[derive(Debug)]
pub enum ProcessOutcome {
    Completed(Output),
    TimedOut,
}

/// Time allowed for the output pipes to close once the child has exited,
/// when the deadline itself has already run out
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Run `cmd` to completion or until `timeout` expires.
///
/// stdout and stderr are drained on background threads so a chatty child
/// cannot stall on a full pipe while we wait on it. Once the child exits the
/// readers get whatever is left of the deadline; a pipe still held open by a
/// grandchild (a `gpg-agent`, say) is abandoned rather than waited on.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> io::Result<ProcessOutcome> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(command = ?cmd, timeout_secs = timeout.as_secs(), "Spawning external command");
    let deadline = Instant::now() + timeout;
    let mut child = cmd.spawn()?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    match child.wait_timeout(timeout)? {
        Some(status) => {
            let drain_deadline = deadline.max(Instant::now() + DRAIN_GRACE);
            Ok(ProcessOutcome::Completed(Output {
                status,
                stdout: collect_drain(stdout, drain_deadline, &cmd)?,
                stderr: collect_drain(stderr, drain_deadline, &cmd)?,
            }))
        }
        None => {
            warn!(command = ?cmd, "External command timed out, killing it");
            kill_and_reap(&mut child);
            Ok(ProcessOutcome::TimedOut)
        }
    }
}

type Drain = Option<mpsc::Receiver<io::Result<Vec<u8>>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut reader| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let result = reader.read_to_end(&mut buf).map(|_| buf);
            let _ = tx.send(result);
        });
        rx
    })
}

fn collect_drain(drain: Drain, deadline: Instant, cmd: &Command) -> io::Result<Vec<u8>> {
    let Some(rx) = drain else {
        return Ok(Vec::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!(command = ?cmd, "Output pipe still open after exit, not waiting for it");
            Ok(Vec::new())
        }
        Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
            io::ErrorKind::Other,
            "output reader panicked",
        )),
    }
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Last non-empty line of stderr, for error messages
pub fn stderr_summary(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    match (line.is_empty(), output.status.code()) {
        (false, _) => line.to_string(),
        (true, Some(code)) => format!("exited with code {}", code),
        (true, None) => "terminated by signal".to_string(),
    }
}
