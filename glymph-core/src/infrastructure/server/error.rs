use super::dto::ErrorResponse;
use crate::application::ServiceError;
use crate::auth::AuthError;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// An error rendered as `{"error": "..."}` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ServiceError::Invocation(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self::new(status, err.user_message())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::Expired
            | AuthError::WrongTokenType { .. }
            | AuthError::Revoked => StatusCode::UNAUTHORIZED,
            AuthError::Inactive | AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::NotFound { .. } => StatusCode::NOT_FOUND,
            AuthError::Conflict { .. } => StatusCode::CONFLICT,
            AuthError::Store(_) | AuthError::Signing(_) | AuthError::Hashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else if status == StatusCode::UNAUTHORIZED {
            warn!(error = %err, "Rejected credentials");
        }
        Self::new(status, err.user_message())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ServiceError::from(err).into()
    }
}

impl From<crate::validation::ValidationError> for ApiError {
    fn from(err: crate::validation::ValidationError) -> Self {
        ServiceError::Validation(err).into()
    }
}
