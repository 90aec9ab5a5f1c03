//! Test utilities and mocks for extbuild unit tests.
//!
//! [`MockExecutor`] stands in for the operating system's process API so that
//! orchestration can be asserted without CMake or Python installed.
//!
//! ```rust,ignore
//! let exec = MockExecutor::new();
//! exec.expect_prefix("cmake --version", MockProcessOutput::success("cmake version 3.16.3"));
//! exec.set_default(MockProcessOutput::success(""));
//!
//! // ... run the orchestrator against &exec ...
//!
//! assert_eq!(exec.calls()[0].get_args(), ["--version"]);
//! ```

use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::util::process::{Executor, ProcessBuilder, ProcessOutput};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Simulate a program that cannot be spawned at all.
    pub spawn_error: bool,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            spawn_error: false,
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
            spawn_error: false,
        }
    }

    /// The program does not exist.
    pub fn not_found() -> Self {
        MockProcessOutput {
            spawn_error: true,
            ..MockProcessOutput::failure(-1, "")
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
        }
    }
}

#[derive(Debug)]
struct CommandExpectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<ProcessBuilder>,
    default_output: Option<MockProcessOutput>,
}

/// Mock process executor for testing command execution.
///
/// Records every command it is asked to run. The first matching expectation
/// wins; unmatched commands fall back to the default or fail.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    fn push(&self, pattern: CommandPattern, output: MockProcessOutput) -> &Self {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push(CommandExpectation { pattern, output });
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.state.lock().unwrap().default_output = Some(output);
        self
    }

    /// All commands that were run, in order.
    pub fn calls(&self) -> Vec<ProcessBuilder> {
        self.state.lock().unwrap().calls.clone()
    }

    /// All commands that were run, rendered as strings.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(ProcessBuilder::display_command).collect()
    }

    fn respond(&self, cmd: &ProcessBuilder) -> Result<MockProcessOutput> {
        let line = cmd.display_command();
        let mut state = self.state.lock().unwrap();
        state.calls.push(cmd.clone());

        let output = state
            .expectations
            .iter()
            .find(|exp| exp.pattern.matches(&line))
            .map(|exp| exp.output.clone())
            .or_else(|| state.default_output.clone());

        match output {
            Some(output) if output.spawn_error => {
                bail!("failed to spawn `{}`", cmd.get_program().display())
            }
            Some(output) => Ok(output),
            None => bail!("unexpected command: {}", line),
        }
    }
}

impl Executor for MockExecutor {
    fn output(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let out = self.respond(cmd)?;
        Ok(ProcessOutput {
            code: Some(out.status),
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }

    fn status(&self, cmd: &ProcessBuilder) -> Result<Option<i32>> {
        Ok(Some(self.respond(cmd)?.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_expectation_wins() {
        let exec = MockExecutor::new();
        exec.expect_prefix("cmake --build", MockProcessOutput::failure(2, "boom"));
        exec.expect_prefix("cmake", MockProcessOutput::success("ok"));

        let build = ProcessBuilder::new("cmake").args(["--build", "."]);
        let other = ProcessBuilder::new("cmake").arg("/src");

        assert_eq!(exec.status(&build).unwrap(), Some(2));
        assert_eq!(exec.status(&other).unwrap(), Some(0));
        assert_eq!(exec.call_lines(), vec!["cmake --build .", "cmake /src"]);
    }

    #[test]
    fn test_unexpected_command_fails() {
        let exec = MockExecutor::new();
        assert!(exec.output(&ProcessBuilder::new("ninja")).is_err());
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn test_not_found_is_spawn_error() {
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::not_found());

        let err = exec
            .output(&ProcessBuilder::new("cmake").arg("--version"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}
