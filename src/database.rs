use std::fs;
use std::path::{Path, PathBuf};

use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::create_timestamp;
use crate::routes::{CaseResult, SubmissionRecord, TestCase};
use crate::verdict::{CaseVerdict, Status};

const DATABASE_NAME: &str = "codejudge.sqlite3";

pub fn get_db_path() -> PathBuf {
    use directories::ProjectDirs;

    let proj_dirs = ProjectDirs::from("", "", "codejudge").expect("Unable to find user directory");
    let data_dir = proj_dirs.data_local_dir();

    fs::create_dir_all(data_dir).expect("Failed to create local data dir");

    data_dir.join(DATABASE_NAME)
}

pub async fn init_db(db_path: impl AsRef<Path>) -> sqlx::Result<SqlitePool> {
    let db_url = format!("sqlite://{}?mode=rwc", db_path.as_ref().display()); // rwc = read/write/create
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(0)
        .connect(&db_url)
        .await?;

    // PRAGMA statements cannot run inside a transaction
    for pragma_sql in &[
        "PRAGMA foreign_keys = ON;",
        "PRAGMA busy_timeout = 2000;",
        "PRAGMA journal_mode = WAL;",
        "PRAGMA synchronous = NORMAL;",
    ] {
        sqlx::query(pragma_sql).execute(&db_pool).await?;
    }

    let mut tx = db_pool.begin().await?;

    for sql in &[
        r"
        CREATE TABLE IF NOT EXISTS submissions (
            token             TEXT     PRIMARY KEY,
            language_id       INTEGER  NOT NULL,
            source_code       TEXT     NOT NULL,
            status            TEXT     NOT NULL,
            total_runtime_ms  INTEGER  NOT NULL DEFAULT 0,
            created_time      TEXT     NOT NULL,
            updated_time      TEXT     NOT NULL
        );",
        r"
        CREATE TABLE IF NOT EXISTS submission_case (
            token            TEXT     NOT NULL,
            case_index       INTEGER  NOT NULL,
            input            TEXT     NOT NULL,
            expected_output  TEXT     NOT NULL,
            actual_output    TEXT,
            stderr           TEXT,
            verdict          TEXT,
            runtime_ms       INTEGER,
            PRIMARY KEY (token, case_index),
            FOREIGN KEY (token)  REFERENCES submissions (token)
        );",
    ] {
        sqlx::query(sql).execute(tx.as_mut()).await?;
    }

    tx.commit().await?;

    log::info!("Initialized database at {}", db_path.as_ref().display());

    Ok(db_pool)
}

pub fn remove_db(db_path: impl AsRef<Path>) {
    // Remove WAL and SHM files (they might not exist)
    let wal_path = format!("{}-wal", db_path.as_ref().display());
    let shm_path = format!("{}-shm", db_path.as_ref().display());
    let _ = fs::remove_file(wal_path);
    let _ = fs::remove_file(shm_path);

    if let Err(e) = std::fs::remove_file(&db_path) {
        log::warn!(
            "Unable to remove database at {}: {e}",
            db_path.as_ref().display()
        );
    } else {
        log::info!("Removed database at {}", db_path.as_ref().display());
    }
}

/// Creates a new submission in the `InQueue` state, along with its immutable
/// test cases.
pub async fn create_submission(
    token: &str,
    language_id: u32,
    source_code: &str,
    cases: &[TestCase],
    pool: &SqlitePool,
) -> sqlx::Result<()> {
    let now = create_timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO submissions (token, language_id, source_code, status, created_time, updated_time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(token)
    .bind(language_id)
    .bind(source_code)
    .bind(Status::InQueue.as_str())
    .bind(&now)
    .bind(&now)
    .execute(tx.as_mut())
    .await?;

    for (index, case) in cases.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO submission_case (token, case_index, input, expected_output)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(token)
        .bind(index as u32)
        .bind(&case.input)
        .bind(&case.expected_output)
        .execute(tx.as_mut())
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Fetches the full submission record; `results` is populated only for rows
/// that have actually been judged (i.e. once the status is terminal).
pub async fn fetch_submission(token: &str, pool: &SqlitePool) -> sqlx::Result<SubmissionRecord> {
    let row = sqlx::query(
        r#"
        SELECT language_id, source_code, status, total_runtime_ms, created_time, updated_time
        FROM submissions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .fetch_one(pool)
    .await?;

    let status = parse_status(&row)?;

    let case_rows = sqlx::query(
        r#"
        SELECT case_index, input, expected_output, actual_output, stderr, verdict, runtime_ms
        FROM submission_case
        WHERE token = ?
        ORDER BY case_index
        "#,
    )
    .bind(token)
    .fetch_all(pool)
    .await?;

    let mut test_cases = Vec::with_capacity(case_rows.len());
    let mut results = Vec::with_capacity(case_rows.len());
    for case_row in &case_rows {
        let input: String = case_row.get("input");
        let expected_output: String = case_row.get("expected_output");
        test_cases.push(TestCase {
            input: input.clone(),
            expected_output: expected_output.clone(),
        });

        let verdict: Option<String> = case_row.get("verdict");
        if let Some(verdict) = verdict {
            let verdict = CaseVerdict::parse(&verdict).ok_or_else(|| decode_error("verdict"))?;
            let runtime_ms: Option<i64> = case_row.get("runtime_ms");
            results.push(CaseResult {
                index: case_row.get::<u32, _>("case_index"),
                input,
                expected_output,
                actual_output: case_row
                    .get::<Option<String>, _>("actual_output")
                    .unwrap_or_default(),
                stderr: case_row
                    .get::<Option<String>, _>("stderr")
                    .unwrap_or_default(),
                verdict,
                runtime_ms: runtime_ms.unwrap_or(0) as u64,
            });
        }
    }

    Ok(SubmissionRecord {
        token: token.to_string(),
        language_id: row.get("language_id"),
        source_code: row.get("source_code"),
        status,
        test_cases,
        results,
        total_runtime_ms: row.get::<i64, _>("total_runtime_ms") as u64,
        created_time: row.get("created_time"),
        updated_time: row.get("updated_time"),
    })
}

/// Moves a submission from `InQueue` to `Processing`. The `InQueue` guard
/// keeps the transition forward-only even if a token is redelivered.
pub async fn mark_processing(token: &str, pool: &SqlitePool) -> sqlx::Result<()> {
    let now = create_timestamp();
    sqlx::query(
        r#"
        UPDATE submissions
        SET status = ?, updated_time = ?
        WHERE token = ? AND status = ?
        "#,
    )
    .bind(Status::Processing.as_str())
    .bind(&now)
    .bind(token)
    .bind(Status::InQueue.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Persists the terminal status, the per-case results, and the total runtime
/// in a single transaction.
pub async fn save_results(
    token: &str,
    status: Status,
    total_runtime_ms: u64,
    results: &[CaseResult],
    pool: &SqlitePool,
) -> sqlx::Result<()> {
    let now = create_timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE submissions
        SET status = ?, total_runtime_ms = ?, updated_time = ?
        WHERE token = ?
        "#,
    )
    .bind(status.as_str())
    .bind(total_runtime_ms as i64)
    .bind(&now)
    .bind(token)
    .execute(tx.as_mut())
    .await?;

    for case in results {
        sqlx::query(
            r#"
            UPDATE submission_case
            SET actual_output = ?, stderr = ?, verdict = ?, runtime_ms = ?
            WHERE token = ? AND case_index = ?
            "#,
        )
        .bind(&case.actual_output)
        .bind(&case.stderr)
        .bind(case.verdict.as_str())
        .bind(case.runtime_ms as i64)
        .bind(token)
        .bind(case.index)
        .execute(tx.as_mut())
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Terminal fallback for a pipeline that failed before producing results.
/// Only a non-terminal submission can be moved here.
pub async fn mark_internal_error(token: &str, pool: &SqlitePool) -> sqlx::Result<()> {
    let now = create_timestamp();
    sqlx::query(
        r#"
        UPDATE submissions
        SET status = ?, updated_time = ?
        WHERE token = ? AND status IN (?, ?)
        "#,
    )
    .bind(Status::InternalError.as_str())
    .bind(&now)
    .bind(token)
    .bind(Status::InQueue.as_str())
    .bind(Status::Processing.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

fn parse_status(row: &SqliteRow) -> sqlx::Result<Status> {
    let raw: String = row.get("status");
    Status::parse(&raw).ok_or_else(|| decode_error("status"))
}

fn decode_error(column: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unrecognized value in column {column}").into(),
    }
}
