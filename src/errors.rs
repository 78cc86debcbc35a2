use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Engine-level failures surfaced by the services.
///
/// Everything a caller can act on gets its own variant; storage plumbing
/// collapses into `Transient`, which is safe to retry.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid score: {0}")]
    InvalidScore(String),

    #[error("incomplete placement: {0}")]
    IncompletePlacement(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("ledger consistency violation: {0}")]
    Consistency(String),

    #[error("invalid transition: cannot {action} from status '{from}'")]
    InvalidTransition { from: String, action: String },

    #[error("not authorized: {0}")]
    Authorization(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("match {0} has already been processed")]
    AlreadyProcessed(i64),

    #[error("tournament {0} has already been finalized")]
    AlreadyFinalized(i64),

    #[error("tournament {0} is at capacity")]
    Capacity(i64),

    #[error("transient storage failure: {0}")]
    Transient(String),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        EngineError::NotFound { entity, id }
    }

    pub fn invalid_transition(from: &str, action: &str) -> Self {
        EngineError::InvalidTransition {
            from: from.to_string(),
            action: action.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Consistency(_) | EngineError::Transient(_))
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Transient(err.to_string())
    }
}

impl From<r2d2::Error> for EngineError {
    fn from(err: r2d2::Error) -> Self {
        EngineError::Transient(err.to_string())
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Transient(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Validation(format!("malformed score payload: {err}"))
    }
}
