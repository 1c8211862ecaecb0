use axum::http::StatusCode;
use thiserror::Error;

use chirpy_db::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("email already registered")]
    EmailExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no account matches these credentials")]
    NoSuchUser,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token was issued for another purpose")]
    WrongIssuer,
    #[error("token has been revoked")]
    Revoked,
    #[error("token subject is not an account id")]
    MalformedSubject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("requester does not own this chirp")]
    NotOwner,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error("not found")]
    NotFound,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// Status code surfaced by the HTTP layer. Every authentication failure
    /// collapses to 401 so callers cannot tell the sub-cases apart.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Authz(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Hashing(_) | Self::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
