use std::fs;
use std::sync::atomic::{AtomicU32, Ordering};

use pretty_assertions::assert_eq;
use sqlx::sqlite::SqlitePool;

use codejudge::config::JudgeConfig;
use codejudge::database as db;
use codejudge::routes::{CaseResult, TestCase};
use codejudge::verdict::{CaseVerdict, Status};
use codejudge::worker;

// Global counter to ensure unique test database names
static TEST_DB_COUNTER: AtomicU32 = AtomicU32::new(0);

struct TestDbGuard {
    db_path: String,
}

impl Drop for TestDbGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
        let _ = fs::remove_file(format!("{}-wal", self.db_path));
        let _ = fs::remove_file(format!("{}-shm", self.db_path));
    }
}

async fn create_test_db() -> (SqlitePool, TestDbGuard) {
    let test_id = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db_path = std::env::temp_dir()
        .join(format!("codejudge_worker_test_{test_id}.db"))
        .to_string_lossy()
        .into_owned();

    let _ = fs::remove_file(&db_path);
    let pool = db::init_db(&db_path)
        .await
        .expect("Failed to initialize test database");

    (pool, TestDbGuard { db_path })
}

fn one_case() -> Vec<TestCase> {
    vec![TestCase {
        input: "1\n".to_string(),
        expected_output: "1".to_string(),
    }]
}

#[tokio::test]
async fn unsupported_language_ends_in_internal_error() {
    let (pool, _guard) = create_test_db().await;
    db::create_submission("tok-unsupported", 999, "print(1)", &one_case(), &pool)
        .await
        .unwrap();

    worker::process_one(1, "tok-unsupported", &JudgeConfig::default(), &pool).await;

    let record = db::fetch_submission("tok-unsupported", &pool).await.unwrap();
    assert_eq!(record.status, Status::InternalError);
    assert!(record.results.is_empty());
}

#[tokio::test]
async fn unknown_token_is_discarded_without_panicking() {
    let (pool, _guard) = create_test_db().await;

    worker::process_one(1, "tok-missing", &JudgeConfig::default(), &pool).await;

    let err = db::fetch_submission("tok-missing", &pool).await.unwrap_err();
    assert!(matches!(err, sqlx::Error::RowNotFound));
}

#[tokio::test]
async fn status_only_moves_forward() {
    let (pool, _guard) = create_test_db().await;
    db::create_submission("tok-fwd", 71, "print(1)", &one_case(), &pool)
        .await
        .unwrap();

    db::mark_processing("tok-fwd", &pool).await.unwrap();
    let record = db::fetch_submission("tok-fwd", &pool).await.unwrap();
    assert_eq!(record.status, Status::Processing);

    let results = vec![CaseResult {
        index: 0,
        input: "1\n".to_string(),
        expected_output: "1".to_string(),
        actual_output: "1".to_string(),
        stderr: String::new(),
        verdict: CaseVerdict::Accepted,
        runtime_ms: 42,
    }];
    db::save_results("tok-fwd", Status::Accepted, 42, &results, &pool)
        .await
        .unwrap();

    // Neither pre-terminal transition may clobber a terminal status
    db::mark_processing("tok-fwd", &pool).await.unwrap();
    db::mark_internal_error("tok-fwd", &pool).await.unwrap();

    let record = db::fetch_submission("tok-fwd", &pool).await.unwrap();
    assert_eq!(record.status, Status::Accepted);
    assert_eq!(record.results.len(), record.test_cases.len());
    assert_eq!(record.total_runtime_ms, 42);
}

#[tokio::test]
async fn internal_error_applies_to_stuck_processing() {
    let (pool, _guard) = create_test_db().await;
    db::create_submission("tok-ie", 71, "print(1)", &one_case(), &pool)
        .await
        .unwrap();
    db::mark_processing("tok-ie", &pool).await.unwrap();

    db::mark_internal_error("tok-ie", &pool).await.unwrap();

    let record = db::fetch_submission("tok-ie", &pool).await.unwrap();
    assert_eq!(record.status, Status::InternalError);
}
