use super::token::TokenKind;
use crate::store::StoreError;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account is not active")]
    Inactive,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token has expired")]
    Expired,
    #[error("expected a {expected} token")]
    WrongTokenType { expected: TokenKind },
    #[error("token has been revoked")]
    Revoked,
    #[error("'{action}' requires the admin role")]
    Forbidden { action: String },
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} '{key}' already exists")]
    Conflict { entity: &'static str, key: String },
    #[error(transparent)]
    Store(StoreError),
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(err) => err.to_string(),
            AuthError::InvalidCredentials => "Invalid username or password.".to_string(),
            AuthError::Inactive => "Account is not active.".to_string(),
            AuthError::MissingToken => "A bearer token is required.".to_string(),
            AuthError::InvalidToken(_) | AuthError::WrongTokenType { .. } => {
                "Invalid token.".to_string()
            }
            AuthError::Expired => "Token has expired.".to_string(),
            AuthError::Revoked => "Token has been revoked.".to_string(),
            AuthError::Forbidden { action } => format!("'{action}' requires the admin role."),
            AuthError::NotFound { entity, key } => format!("{entity} '{key}' was not found."),
            AuthError::Conflict { entity, key } => format!("{entity} '{key}' already exists."),
            AuthError::Store(err) => err.user_message(),
            AuthError::Signing(_) => "Could not issue a token.".to_string(),
            AuthError::Hashing(_) => "Could not store the password.".to_string(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, key } => AuthError::NotFound { entity, key },
            StoreError::Conflict { entity, key } => AuthError::Conflict { entity, key },
            other => AuthError::Store(other),
        }
    }
}
