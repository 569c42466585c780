#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("inference endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("inference request timed out after {timeout_ms}ms")]
    Timeout {
        timeout_ms: u64,
    },
    #[error("inference request failed with status {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    #[error("invalid inference response format: {0}")]
    MalformedResponse(String),
    #[error("inference endpoint did not return token IDs; enable token_ids in the serving configuration")]
    MissingTokenIds,
}
