use std::time::Duration;

use anyhow::Result;

use super::docker::{encode_source, run_container};
use super::runner::{Execution, SandboxRunner};
use crate::config::JudgeConfig;

/// Runs Python 3 sources in an isolated container.
///
/// The source is decoded from CODE_B64 into the scratch tmpfs and executed
/// under `timeout`, which produces the reserved 124 exit code when the
/// per-case limit is exceeded.
#[derive(Debug)]
pub struct PythonRunner {
    config: JudgeConfig,
}

impl PythonRunner {
    pub fn new(config: JudgeConfig) -> Self {
        Self { config }
    }
}

impl SandboxRunner for PythonRunner {
    fn execute(&self, source: &str, stdin: &str, time_limit: Duration) -> Result<Execution> {
        let script = format!(
            "echo \"$CODE_B64\" | base64 -d > /tmp/main.py && timeout {}s python /tmp/main.py",
            time_limit.as_secs()
        );

        run_container(
            &self.config,
            &self.config.python_image,
            &encode_source(source),
            &["PYTHONDONTWRITEBYTECODE=1"],
            &script,
            stdin,
            time_limit,
        )
    }
}
