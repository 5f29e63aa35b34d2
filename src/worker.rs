use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::config::JudgeConfig;
use crate::database as db;
use crate::judge;
use crate::queue::SubmissionQueue;
use crate::routes::SubmissionRecord;
use crate::sandbox;
use crate::verdict::Status;

pub async fn worker(
    id: u8,
    config: Arc<JudgeConfig>,
    db_pool: Arc<SqlitePool>,
    queue: Arc<SubmissionQueue>,
    token: CancellationToken,
) -> anyhow::Result<()> {
    log::info!("Worker {id} initialized");

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                log::info!("Worker {id} received shutdown signal, stopping");
                break;
            }

            submission_token = queue.pop() => {
                log::info!("Worker {id} got submission {submission_token} from queue");
                process_one(id, &submission_token, &config, &db_pool).await;
            }
        }
    }

    log::info!("Worker {id} has shut down gracefully");
    Ok(())
}

/// Judges a single submission end to end.
///
/// This is the catch-all boundary: any failure past the Processing
/// transition marks the submission `InternalError` instead of leaving it
/// stuck, and never propagates out to kill the consumer loop.
pub async fn process_one(id: u8, token: &str, config: &JudgeConfig, db_pool: &SqlitePool) {
    // 1. Load the full submission
    let submission = match db::fetch_submission(token, db_pool).await {
        Ok(submission) => submission,
        Err(e) => {
            log::error!("Failed to fetch submission {token}, discarded: {e}");
            return;
        }
    };

    // 2. Move it to Processing
    if let Err(e) = db::mark_processing(token, db_pool).await {
        log::error!("Failed to update submission {token} to Processing: {e}");
        return;
    }

    // 3. Run the pipeline; any error lands in InternalError
    match run_pipeline(submission, config, db_pool).await {
        Ok(status) => {
            log::info!(
                "Submission {token} finished on worker {id}: {}",
                status.as_str()
            );
        }
        Err(e) => {
            log::error!("Judging submission {token} failed on worker {id}: {e:#}");
            if let Err(e) = db::mark_internal_error(token, db_pool).await {
                log::error!("Failed to mark submission {token} as InternalError: {e}");
            }
        }
    }
}

async fn run_pipeline(
    submission: SubmissionRecord,
    config: &JudgeConfig,
    db_pool: &SqlitePool,
) -> anyhow::Result<Status> {
    // Unknown languages fail here, before any sandbox is launched
    let runner = sandbox::runner_for(submission.language_id, config)?;
    let time_limit = Duration::from_secs(config.time_limit_secs);
    let token = submission.token.clone();

    // Judging blocks on sandboxed processes; keep it off the async executor
    let outcome = tokio::task::spawn_blocking(move || {
        judge::judge_submission(
            runner.as_ref(),
            &submission.source_code,
            &submission.test_cases,
            time_limit,
        )
    })
    .await??;

    db::save_results(
        &token,
        outcome.status,
        outcome.total_runtime_ms,
        &outcome.results,
        db_pool,
    )
    .await?;

    Ok(outcome.status)
}
