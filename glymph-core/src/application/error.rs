use crate::agent::AgentError;
use crate::store::StoreError;
use crate::validation::ValidationError;
use thiserror::Error;

/// Failures of the agent and catalog services, in the taxonomy the API reports.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} '{key}' already exists")]
    Conflict { entity: &'static str, key: String },
    #[error(transparent)]
    Store(StoreError),
    #[error("agent invocation failed: {0}")]
    Invocation(#[from] AgentError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(err) => err.to_string(),
            ServiceError::NotFound { entity, key } => format!("{entity} '{key}' was not found."),
            ServiceError::Conflict { entity, key } => format!("{entity} '{key}' already exists."),
            ServiceError::Store(err) => err.user_message(),
            ServiceError::Invocation(_) => "The agent failed to produce a response.".to_string(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, key } => ServiceError::NotFound { entity, key },
            StoreError::Conflict { entity, key } => ServiceError::Conflict { entity, key },
            other => ServiceError::Store(other),
        }
    }
}
