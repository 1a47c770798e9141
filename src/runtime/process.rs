use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::errors::CheckError;

/// A subprocess invocation: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
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
        self.cwd = Some(dir.into());
        self
    }

    /// Shell-like rendering used in logs and failure messages.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(char::is_whitespace) || arg.contains('\n') {
                line.push_str(&format!("{:?}", first_line(arg)));
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

fn first_line(arg: &str) -> String {
    match arg.lines().next() {
        Some(line) if arg.lines().count() > 1 => format!("{}...", line),
        Some(line) => line.to_string(),
        None => String::new(),
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn status(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "a signal".to_string(),
        }
    }

    /// Last non-empty stderr line, which for a Python traceback is the
    /// raised exception.
    pub fn last_error_line(&self) -> Option<&str> {
        self.stderr.lines().rev().map(str::trim).find(|line| !line.is_empty())
    }

    pub fn last_stdout_line(&self) -> Option<&str> {
        self.stdout.lines().rev().map(str::trim).find(|line| !line.is_empty())
    }
}

/// Seam for every subprocess the harness starts.
pub trait CommandRunner {
    /// Runs the command to completion. Only a failure to launch is an
    /// error; a non-zero exit is reported through [`CommandOutput`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CheckError>;
}

/// Runs commands with `std::process::Command`, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CheckError> {
        log::debug!("Running `{}`", spec.display());

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| CheckError::Launch {
            command: spec.display(),
            source,
        })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::debug!("`{}` finished with {}", spec.program, result.status());
        Ok(result)
    }
}

/// The project's Python interpreter, run from the project directory.
#[derive(Clone)]
pub struct Python {
    program: String,
    project_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl Python {
    pub fn new(
        program: impl Into<String>,
        project_dir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            program: program.into(),
            project_dir: project_dir.into(),
            runner,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(&self.program)
            .args(args)
            .current_dir(&self.project_dir)
    }

    pub fn run<I, S>(&self, args: I) -> Result<CommandOutput, CheckError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run(&self.command(args))
    }

    /// `python -m <module> <args...>`
    pub fn run_module<I, S>(&self, module: &str, args: I) -> Result<CommandOutput, CheckError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = self
            .command(["-m", module])
            .args(args);
        self.runner.run(&spec)
    }

    /// `python -c <code> <args...>`; the extra arguments land in `sys.argv[1:]`.
    pub fn eval<I, S>(&self, code: &str, args: I) -> Result<CommandOutput, CheckError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = self.command(["-c", code]).args(args);
        self.runner.run(&spec)
    }
}
