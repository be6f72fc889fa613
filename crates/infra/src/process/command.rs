//! Shell command runner
//!
//! Wraps [`std::process::Command`] with:
//! - Timeout handling using the `wait-timeout` crate (the child is killed
//!   and reaped)
//! - stdout/stderr drained on background threads so a chatty child cannot
//!   block on a full pipe; after a timeout the readers get a short grace
//!   period, so a grandchild holding the pipes open cannot stall the call
//! - Three error conventions: [`Command::execute`] fails,
//!   [`Command::run`] answers a bool, [`Command::run_with_result`] never fails
//!
//! # Example
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use helpkit_infra::process::Command;
//!
//! fn main() -> helpkit_domain::Result<()> {
//!     let result = Command::new("git")
//!         .args(["rev-parse", "--short", "HEAD"])
//!         .timeout(Duration::from_secs(5))
//!         .execute()?;
//!     println!("revision: {}", result.output());
//!     Ok(())
//! }
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command as StdCommand, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use helpkit_domain::constants::DEFAULT_COMMAND_TIMEOUT_SECS;
use helpkit_domain::{CommandConfig, CommandResult, HelpkitError, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

const DEFAULT_SHELL: &str = "sh";

/// How long output readers may keep running once a timed out child is killed
const PIPE_GRACE_PERIOD: Duration = Duration::from_millis(500);
const PIPE_POLL_INTERVAL: Duration = Duration::from_millis(10);
const PIPE_CHUNK_SIZE: usize = 8 * 1024;

/// Builder for one process invocation
#[derive(Debug, Clone)]
pub struct Command {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
            timeout: Some(Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS)),
        }
    }

    /// Run `line` through `sh -c`
    ///
    /// On timeout only the shell is killed. Programs it started keep running
    /// but the call returns after a short grace period with the output read
    /// so far.
    pub fn shell(line: impl Into<String>) -> Self {
        Self::new(DEFAULT_SHELL).arg("-c").arg(line)
    }

    /// Run `line` through the configured shell with the configured timeout
    pub fn shell_with_config(config: &CommandConfig, line: impl Into<String>) -> Self {
        Self::new(config.shell.as_str())
            .arg("-c")
            .arg(line)
            .timeout(Duration::from_secs(config.timeout_seconds))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wait as long as the child runs
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Command line for logs and error messages, arguments quoted when needed
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion, failing unless the exit code is zero
    ///
    /// # Errors
    /// `HelpkitError::Process` when the program cannot be started, times out
    /// or exits with a non-zero status (stderr is included in the message).
    pub fn execute(&self) -> Result<CommandResult> {
        let command = self.display();
        let result = self.launch().map_err(|err| {
            warn!(%command, error = %err, "failed to start command");
            HelpkitError::Process(format!("failed to start `{command}`: {err}"))
        })?;

        if result.timed_out {
            return Err(HelpkitError::Process(format!(
                "`{command}` timed out after {:.1}s",
                result.duration.as_secs_f64()
            )));
        }

        match result.exit_code {
            Some(0) => Ok(result),
            Some(code) => Err(HelpkitError::Process(format!(
                "`{command}` failed with exit code {code}: {}",
                result.error_output()
            ))),
            None => Err(HelpkitError::Process(format!("`{command}` was terminated by a signal"))),
        }
    }

    /// `true` when the command ran and exited with status zero
    pub fn run(&self) -> bool {
        self.run_with_result().is_successful()
    }

    /// Always produce a result; start failures land in `stderr` with no exit
    /// code
    pub fn run_with_result(&self) -> CommandResult {
        self.launch().unwrap_or_else(|err| {
            warn!(command = %self.display(), error = %err, "failed to start command");
            CommandResult::spawn_failure(self.display(), err.to_string())
        })
    }

    fn launch(&self) -> io::Result<CommandResult> {
        let command = self.display();
        debug!(%command, timeout_secs = ?self.timeout.map(|t| t.as_secs()), "running command");

        let mut process = StdCommand::new(&self.program);
        process
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            process.current_dir(dir);
        }

        let started = Instant::now();
        let mut child = process.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let (exit_code, timed_out) = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout)? {
                Some(status) => (status.code(), false),
                None => {
                    warn!(%command, timeout_secs = timeout.as_secs_f64(), "command timed out, killing process");
                    let _ = child.kill();
                    child.wait()?; // reap the zombie
                    (None, true)
                }
            },
            None => (child.wait()?.code(), false),
        };

        // grandchildren may still hold the pipes after a kill
        let deadline = timed_out.then(|| Instant::now() + PIPE_GRACE_PERIOD);
        let result = CommandResult {
            command,
            exit_code,
            stdout: collect(stdout, deadline),
            stderr: collect(stderr, deadline),
            duration: started.elapsed(),
            timed_out,
        };

        debug!(
            command = %result.command,
            exit_code = ?result.exit_code,
            duration_ms = u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
            "command finished"
        );
        Ok(result)
    }
}

/// Output of one pipe, filled chunk by chunk by a reader thread
struct PipeReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    handle: JoinHandle<()>,
}

fn drain<R>(pipe: Option<R>) -> Option<PipeReader>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let handle = thread::spawn(move || {
            let mut chunk = [0_u8; PIPE_CHUNK_SIZE];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(read) => sink.lock().extend_from_slice(&chunk[..read]),
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                    Err(_) => break,
                }
            }
        });
        PipeReader { buffer, handle }
    })
}

/// Wait for the reader, giving up at `deadline` and keeping what was read
fn collect(reader: Option<PipeReader>, deadline: Option<Instant>) -> String {
    let Some(PipeReader { buffer, handle }) = reader else {
        return String::new();
    };
    match deadline {
        None => {
            let _ = handle.join();
        }
        Some(deadline) => {
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(PIPE_POLL_INTERVAL);
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                debug!("pipe still open after kill, leaving reader behind");
            }
        }
    }
    let bytes = buffer.lock();
    let text = String::from_utf8_lossy(&bytes).into_owned();
    text
}

fn quote(part: &str) -> String {
    let plain = !part.is_empty()
        && part.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+%".contains(c));
    if plain {
        part.to_string()
    } else {
        format!("'{}'", part.replace('\'', r"'\''"))
    }
}
