mod submissions;

pub use submissions::{create_submission_handler, get_submission_handler, health_handler};

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::verdict::{CaseVerdict, Status};

/// One test case as submitted by the client. Immutable after creation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

/// Result of one executed test case, recorded once judging reaches a
/// terminal status.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CaseResult {
    pub index: u32,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub stderr: String,
    pub verdict: CaseVerdict,
    pub runtime_ms: u64,
}

/// The full client-facing view of a submission.
#[derive(Serialize, Deserialize, Debug)]
pub struct SubmissionRecord {
    pub token: String,
    pub language_id: u32,
    pub source_code: String,
    pub status: Status,
    pub test_cases: Vec<TestCase>,
    /// Empty until `status` is terminal, then one entry per test case.
    pub results: Vec<CaseResult>,
    pub total_runtime_ms: u64,
    pub created_time: String,
    pub updated_time: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubmissionRequest {
    pub language_id: u32,
    pub source_code: String,
    pub test_cases: Vec<TestCase>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedResponse {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = HttpResponse::BadRequest().json(ErrorResponse { error: message });
    InternalError::from_response(err, response).into()
}
