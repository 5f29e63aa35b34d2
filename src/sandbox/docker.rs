use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use super::TIMEOUT_EXIT_CODE;
use super::runner::Execution;
use crate::config::JudgeConfig;

/// Slack on top of the per-case limit before the worker kills the container
/// client itself. The in-container `timeout` is the primary enforcement;
/// this outer guard covers the cases where it never runs (image pull,
/// container start failure).
const KILL_GRACE: Duration = Duration::from_secs(10);

pub(super) fn encode_source(source: &str) -> String {
    STANDARD.encode(source.as_bytes())
}

/// Launches `script` inside an isolated container, streams `stdin_data` to
/// the program, and captures stdout/stderr fully.
///
/// The source text crosses into the container only base64-encoded in the
/// CODE_B64 environment variable and is decoded inside the sandbox; nothing
/// user-controlled is ever spliced into the shell line.
pub(super) fn run_container(
    config: &JudgeConfig,
    image: &str,
    code_b64: &str,
    extra_env: &[&str],
    script: &str,
    stdin_data: &str,
    time_limit: Duration,
) -> Result<Execution> {
    let cpus = config.cpus.to_string();
    let pids = config.pids_limit.to_string();
    let tmpfs = format!("/tmp:rw,noexec,nosuid,nodev,size={}", config.tmpfs_size);
    let code_env = format!("CODE_B64={code_b64}");

    let mut cmd = tokio::process::Command::new("docker");
    cmd.args([
        "run",
        "--rm",
        "--network",
        "none",
        "--cpus",
        &cpus,
        "--memory",
        &config.memory_limit,
        "--pids-limit",
        &pids,
        "--read-only",
        "--tmpfs",
        &tmpfs,
        "--security-opt",
        "no-new-privileges",
        "-i",
    ]);
    for env in extra_env {
        cmd.args(["-e", env]);
    }
    cmd.args(["-e", &code_env, image, "sh", "-c", script])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let stdin_data = stdin_data.to_string();

    tokio::runtime::Handle::current().block_on(async move {
        let mut child = cmd.spawn().context("failed to spawn docker")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(stdin_data.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        match timeout(time_limit + KILL_GRACE, child.wait_with_output()).await {
            Ok(output) => {
                let output = output?;
                Ok(Execution {
                    // A signal kill yields no code; -1 classifies as a
                    // runtime error downstream
                    exit_code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            // Timeout elapsed without the in-container `timeout` firing;
            // dropping the wait future kills the client (kill_on_drop)
            Err(_) => Ok(Execution {
                exit_code: TIMEOUT_EXIT_CODE,
                stdout: String::new(),
                stderr: "wall-clock limit exceeded".to_string(),
            }),
        }
    })
}
