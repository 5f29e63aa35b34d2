use std::time::{Duration, Instant};

use anyhow::Result;

use crate::comparator;
use crate::routes::{CaseResult, TestCase};
use crate::sandbox::{Execution, SandboxRunner, TIMEOUT_EXIT_CODE};
use crate::verdict::{CaseVerdict, Status};

/// Aggregated outcome of judging one submission.
#[derive(Debug)]
pub struct JudgeOutcome {
    pub status: Status,
    pub results: Vec<CaseResult>,
    pub total_runtime_ms: u64,
}

/// Runs every test case, in declaration order, through the sandbox runner.
///
/// The overall verdict is fixed by the first non-Accepted case, but the
/// remaining cases still execute, so `results` always covers every case.
/// A runner failure (the sandbox could not even be launched) aborts the
/// pipeline with an error; the caller turns that into `InternalError`.
pub fn judge_submission(
    runner: &dyn SandboxRunner,
    source: &str,
    cases: &[TestCase],
    time_limit: Duration,
) -> Result<JudgeOutcome> {
    let mut results = Vec::with_capacity(cases.len());
    let mut first_failure: Option<CaseVerdict> = None;
    let mut total_runtime_ms = 0u64;

    for (index, case) in cases.iter().enumerate() {
        let started = Instant::now();
        let execution = runner.execute(source, &case.input, time_limit)?;
        let runtime_ms = started.elapsed().as_millis() as u64;
        total_runtime_ms += runtime_ms;

        let (verdict, actual_output) = classify(&execution, &case.expected_output);
        log::debug!("Case {index}: {} in {runtime_ms} ms", verdict.as_str());

        if verdict != CaseVerdict::Accepted {
            first_failure = first_failure.or(Some(verdict));
        }

        results.push(CaseResult {
            index: index as u32,
            input: case.input.clone(),
            expected_output: case.expected_output.clone(),
            actual_output,
            stderr: execution.stderr,
            verdict,
            runtime_ms,
        });
    }

    let status = first_failure.map_or(Status::Accepted, Status::from);
    Ok(JudgeOutcome {
        status,
        results,
        total_runtime_ms,
    })
}

/// Classifies one execution and picks the actual output to record: raw
/// stdout for timeouts and crashes, normalized stdout otherwise.
fn classify(execution: &Execution, expected: &str) -> (CaseVerdict, String) {
    if execution.exit_code == TIMEOUT_EXIT_CODE {
        return (CaseVerdict::TimeLimitExceeded, execution.stdout.clone());
    }
    if execution.exit_code != 0 {
        return (CaseVerdict::RuntimeError, execution.stdout.clone());
    }

    let normalized = comparator::normalize(&execution.stdout);
    if comparator::outputs_match(expected, &execution.stdout) {
        (CaseVerdict::Accepted, normalized)
    } else {
        (CaseVerdict::WrongAnswer, normalized)
    }
}
