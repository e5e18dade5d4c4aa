// Error types for token parsing and authentication

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid claims: {0}")]
    InvalidClaims(String),
}

pub type Result<T> = std::result::Result<T, JwtError>;

/// Why a caller could not be authenticated.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingCredentials,

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("IAM sidecar request failed: {0}")]
    Sidecar(#[from] reqwest::Error),
}
