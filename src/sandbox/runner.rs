use std::time::Duration;

use anyhow::Result;

/// Raw outcome of one sandboxed execution.
#[derive(Debug, Clone)]
pub struct Execution {
    /// Process exit code; `TIMEOUT_EXIT_CODE` signals a timeout kill.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for per-language sandboxed execution backends.
///
/// An implementation takes the submitted source and a test case's stdin and
/// produces a resource-constrained, network-isolated execution, blocking
/// until the process exits or is forcibly terminated at the timeout boundary.
/// The judging pipeline only ever sees this signature, so the isolation tool
/// behind it is swappable.
pub trait SandboxRunner: Send + Sync + std::fmt::Debug {
    fn execute(&self, source: &str, stdin: &str, time_limit: Duration) -> Result<Execution>;
}
