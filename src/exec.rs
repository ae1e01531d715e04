// External command seam
//
// Every pass action ends up here. The runner only ever sees a boolean: did the
// command exit successfully or not. Output is never parsed.

use std::fmt;
use std::process::{Command, Stdio};

const SHELL: &str = "/bin/bash";

/// A single external command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Run a full command line through bash (pipes, globs, `||` fallbacks).
    pub fn shell(line: impl Into<String>) -> Self {
        Self::new(SHELL).arg("-c").arg(line)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The bash script when this command was built with [`ShellCommand::shell`].
    pub fn script(&self) -> Option<&str> {
        match self.args.as_slice() {
            [flag, script] if self.program == SHELL && flag == "-c" => Some(script.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(script) = self.script() {
            return f.write_str(script);
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Capability to run an external command and report success or failure.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    fn execute(&self, command: &ShellCommand) -> bool;
}

/// Runs commands as real child processes and waits for them to exit.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    show_output: bool,
}

impl SystemExecutor {
    pub fn new(show_output: bool) -> Self {
        Self { show_output }
    }
}

impl CommandExecutor for SystemExecutor {
    fn execute(&self, command: &ShellCommand) -> bool {
        tracing::debug!(command = %command, "Running");

        let mut cmd = Command::new(command.program());
        cmd.args(command.args());
        if !self.show_output {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        match cmd.status() {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::debug!(command = %command, code = ?status.code(), "Command failed");
                false
            }
            Err(e) => {
                tracing::debug!(command = %command, error = %e, "Command could not be spawned");
                false
            }
        }
    }
}

/// Logs commands instead of running them. Every command "succeeds".
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl CommandExecutor for DryRunExecutor {
    fn execute(&self, command: &ShellCommand) -> bool {
        tracing::info!(command = %command, "dry run");
        true
    }
}
