use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{key}' already exists")]
    Conflict { entity: &'static str, key: String },
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },
    #[error("stored {entity} '{key}' is corrupt: {reason}")]
    Corrupt {
        entity: &'static str,
        key: String,
        reason: String,
    },
    #[error("failed to prepare database directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn conflict(entity: &'static str, key: impl ToString) -> Self {
        Self::Conflict {
            entity,
            key: key.to_string(),
        }
    }

    /// Maps unique-constraint violations raised by a write onto `Conflict`.
    pub(crate) fn on_write(
        entity: &'static str,
        key: impl ToString,
    ) -> impl FnOnce(sqlx::Error) -> Self {
        let key = key.to_string();
        move |err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::Conflict { entity, key }
            }
            other => Self::Database(other),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            StoreError::Conflict { entity, key } => format!("{entity} '{key}' already exists."),
            StoreError::NotFound { entity, key } => format!("{entity} '{key}' was not found."),
            StoreError::Corrupt { .. } | StoreError::Io { .. } | StoreError::Database(_) => {
                "Internal storage error.".to_string()
            }
        }
    }
}
