mod docker;
mod java;
mod python;
mod runner;

pub use runner::{Execution, SandboxRunner};

use anyhow::{Result, bail};
use java::JavaRunner;
use python::PythonRunner;

use crate::config::JudgeConfig;

/// Judge0-compatible language identifiers accepted by the intake API.
pub const LANGUAGE_PYTHON: u32 = 71;
pub const LANGUAGE_JAVA: u32 = 62;

/// Exit code reserved for a wall-clock timeout. This is the value GNU
/// `timeout` produces, which a normal program exit cannot collide with
/// (programs own 0-123 and 125+).
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Resolves the sandbox runner for a language id.
///
/// Unknown ids fail here, before any sandbox is launched.
pub fn runner_for(language_id: u32, config: &JudgeConfig) -> Result<Box<dyn SandboxRunner>> {
    match language_id {
        LANGUAGE_PYTHON => Ok(Box::new(PythonRunner::new(config.clone()))),
        LANGUAGE_JAVA => Ok(Box::new(JavaRunner::new(config.clone()))),
        other => bail!("unsupported language id {other}"),
    }
}
