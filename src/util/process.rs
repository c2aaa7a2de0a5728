//! Subprocess execution utilities.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use thiserror::Error;

/// Failure of an external command, carrying everything needed to report it:
/// the exact command line, the exit status, and the buffered output.
#[derive(Debug, Error)]
#[error("command `{command}` exited with status {status}\n{output}")]
pub struct CommandFailed {
    pub command: String,
    pub status: i32,
    pub output: String,
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
    always_stream: bool,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            always_stream: false,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Stream this command's output even when the runner is not verbose.
    pub fn always_stream(mut self) -> Self {
        self.always_stream = true;
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Whether this command requested unconditional streaming.
    pub fn streams_always(&self) -> bool {
        self.always_stream
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Display the command for status lines and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Run to completion, buffering all output and echoing it line by line
    /// when `stream` is set. Non-zero exit raises [`CommandFailed`] with the
    /// buffered output attached, so a quiet run still reports everything the
    /// failing command printed.
    pub fn exec_streaming(&self, stream: bool) -> Result<()> {
        let mut cmd = self.build_command();
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let stderr = child
            .stderr
            .take()
            .context("stderr handle was not captured")?;
        let stderr_reader = std::thread::spawn(move || -> std::io::Result<Vec<String>> {
            BufReader::new(stderr).lines().collect()
        });

        let stdout = child
            .stdout
            .take()
            .context("stdout handle was not captured")?;
        let mut output = Vec::new();
        for line in BufReader::new(stdout).lines() {
            let line = line
                .with_context(|| format!("failed to read output of `{}`", self.program.display()))?;
            if stream {
                println!("{line}");
            }
            output.push(line);
        }

        let stderr_lines = stderr_reader
            .join()
            .map_err(|_| anyhow::anyhow!("output reader thread panicked"))?
            .with_context(|| format!("failed to read output of `{}`", self.program.display()))?;
        if stream {
            for line in &stderr_lines {
                eprintln!("{line}");
            }
        }
        output.extend(stderr_lines);

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;

        if !status.success() {
            return Err(CommandFailed {
                command: self.display_command(),
                status: status.code().unwrap_or(-1),
                output: output.join("\n"),
            }
            .into());
        }

        Ok(())
    }
}

/// Seam between the orchestration logic and real subprocess execution.
///
/// Production code goes through [`StreamingRunner`]; tests substitute a
/// recording implementation so command sequencing can be asserted without
/// spawning anything.
pub trait CommandRunner: std::fmt::Debug + Send + Sync {
    fn run(&self, cmd: &ProcessBuilder) -> Result<()>;
}

/// Runner used by the CLI: echoes the command line when verbose, streams
/// output, and lets [`CommandFailed`] carry the full report upward.
#[derive(Debug)]
pub struct StreamingRunner {
    verbose: bool,
}

impl StreamingRunner {
    pub fn new(verbose: bool) -> Self {
        StreamingRunner { verbose }
    }
}

impl CommandRunner for StreamingRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<()> {
        let stream = self.verbose || cmd.streams_always();
        if stream {
            println!("{}", cmd.display_command());
        }
        tracing::debug!("running `{}`", cmd.display_command());
        cmd.exec_streaming(stream)
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
