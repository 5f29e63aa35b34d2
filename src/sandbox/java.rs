use std::time::Duration;

use anyhow::Result;

use super::docker::{encode_source, run_container};
use super::runner::{Execution, SandboxRunner};
use crate::config::JudgeConfig;

/// Runs Java 17 sources in an isolated container.
///
/// Compilation and execution share one shell line, so a `javac` failure
/// surfaces as a non-zero exit with the compiler diagnostics on stderr and
/// classifies as a runtime error like any other crash.
#[derive(Debug)]
pub struct JavaRunner {
    config: JudgeConfig,
}

impl JavaRunner {
    pub fn new(config: JudgeConfig) -> Self {
        Self { config }
    }
}

impl SandboxRunner for JavaRunner {
    fn execute(&self, source: &str, stdin: &str, time_limit: Duration) -> Result<Execution> {
        let script = format!(
            "echo \"$CODE_B64\" | base64 -d > /tmp/Main.java && cd /tmp && javac Main.java && timeout {}s java Main",
            time_limit.as_secs()
        );

        run_container(
            &self.config,
            &self.config.java_image,
            &encode_source(source),
            &[],
            &script,
            stdin,
            time_limit,
        )
    }
}
