// src/invoke.rs

//! Conversion invocation
//!
//! Builds the fixed-shape command line for one package and runs the
//! external tool as a child process. Children are run one at a time and
//! always waited on. A failing child never becomes an `Err`: every run
//! ends in a [`ConversionOutcome`] that the batch records and moves past.

use crate::config::BatchConfig;
use crate::error::{Error, Result};
use crate::package::Package;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

/// Argument vector for converting one package
///
/// Shape: `<tool> <tool_args...> <out_dir_flag> <dest>/<name> <source>/<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCommand {
    package: String,
    program: OsString,
    args: Vec<OsString>,
}

impl ConversionCommand {
    /// Build the command for `package` from the configured roots and tool
    pub fn build(config: &BatchConfig, package: &Package) -> Self {
        let mut args: Vec<OsString> = config.tool_args.iter().map(OsString::from).collect();
        args.push(OsString::from(&config.out_dir_flag));
        args.push(package.destination_path(&config.destination_root).into_os_string());
        args.push(package.source_path(&config.source_root).into_os_string());

        Self {
            package: package.display_name().into_owned(),
            program: OsString::from(&config.tool),
            args,
        }
    }

    /// Package this command converts
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for ConversionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in self.argv() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}", part.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a single conversion ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Tool exited with status zero
    Succeeded,
    /// Tool exited non-zero; `code` is `None` when it died from a signal
    Failed { code: Option<i32> },
    /// Tool exceeded the configured timeout; its whole process group was killed
    TimedOut { after: Duration },
    /// Tool could not be started or waited on
    ProcessError { reason: String },
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            Self::Succeeded
        } else {
            Self::Failed {
                code: status.code(),
            }
        }
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed { code: Some(code) } => write!(f, "exited with code {}", code),
            Self::Failed { code: None } => write!(f, "terminated by signal"),
            Self::TimedOut { after } => write!(f, "timed out after {} seconds", after.as_secs()),
            Self::ProcessError { reason } => write!(f, "process error: {}", reason),
        }
    }
}

/// Something that can carry out a conversion command
pub trait Converter {
    /// Run one conversion to completion
    fn convert(&self, command: &ConversionCommand) -> ConversionOutcome;

    /// Whether the external tool must exist before the batch starts
    fn requires_tool(&self) -> bool {
        true
    }
}

/// Runs the external tool as a child process
#[derive(Debug, Clone, Default)]
pub struct ToolConverter {
    timeout: Option<Duration>,
    capture_output: bool,
}

impl ToolConverter {
    /// Converter inheriting the caller's streams, with no timeout
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        let converter = Self::new().with_captured_output(config.capture_output);
        match config.timeout() {
            Some(timeout) => converter.with_timeout(timeout),
            None => converter,
        }
    }

    /// Set a per-conversion timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Pipe the tool's output into the log instead of inheriting it
    pub fn with_captured_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    fn wait(&self, child: &mut Child) -> std::io::Result<Option<ExitStatus>> {
        match self.timeout {
            Some(timeout) => child.wait_timeout(timeout),
            None => child.wait().map(Some),
        }
    }
}

impl Converter for ToolConverter {
    fn convert(&self, command: &ConversionCommand) -> ConversionOutcome {
        debug!("Executing: {}", command);

        let mut process = command.to_command();
        if self.capture_output {
            process
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }

        // A timed-out tool is killed together with everything it started
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if self.timeout.is_some() {
                process.process_group(0);
            }
        }

        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(e) => {
                let program = command.program().to_string_lossy();
                return ConversionOutcome::ProcessError {
                    reason: format!("failed to spawn {}: {}", program, e),
                };
            }
        };

        // Drain pipes while waiting so a chatty tool cannot fill them and stall
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let outcome = match self.wait(&mut child) {
            Ok(Some(status)) => ConversionOutcome::from_status(status),
            Ok(None) => {
                kill_process_group(&mut child);
                ConversionOutcome::TimedOut {
                    after: self.timeout.unwrap_or_default(),
                }
            }
            Err(e) => ConversionOutcome::ProcessError {
                reason: format!("failed to wait for child: {}", e),
            },
        };

        // Anything that escaped the process group may still hold the pipes open
        if !matches!(
            outcome,
            ConversionOutcome::Succeeded | ConversionOutcome::Failed { .. }
        ) {
            return outcome;
        }

        // Tool stdout is only noise when the conversion worked
        let succeeded = outcome.is_success();
        if let Some(handle) = stdout {
            for line in collect(handle).lines() {
                if succeeded {
                    info!("[{}] {}", command.package(), line);
                } else {
                    warn!("[{}] {}", command.package(), line);
                }
            }
        }
        if let Some(handle) = stderr {
            for line in collect(handle).lines() {
                warn!("[{}] {}", command.package(), line);
            }
        }

        outcome
    }
}

#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let pgid = Pid::from_raw(child.id() as i32);
    if let Err(e) = killpg(pgid, Signal::SIGKILL) {
        debug!("killpg({}) failed: {}", pgid, e);
        let _ = child.kill();
    }
    let _ = child.wait();
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: JoinHandle<Vec<u8>>) -> String {
    let bytes = handle.join().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Prints each command instead of running it
pub struct DryRunConverter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> DryRunConverter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DryRunConverter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Converter for DryRunConverter<W> {
    fn convert(&self, command: &ConversionCommand) -> ConversionOutcome {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match writeln!(out, "  would run: {}", command).and_then(|_| out.flush()) {
            Ok(()) => ConversionOutcome::Succeeded,
            Err(e) => ConversionOutcome::ProcessError {
                reason: e.to_string(),
            },
        }
    }

    fn requires_tool(&self) -> bool {
        false
    }
}

/// Locate the tool on `PATH` (or as a path)
pub fn resolve_tool(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| Error::ToolNotFound {
        tool: tool.to_string(),
    })
}
