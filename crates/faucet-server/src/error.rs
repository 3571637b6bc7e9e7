//! Error handling for the faucet server.

use axum::{http::StatusCode, response::IntoResponse, Json};
use faucet_core::{AddressError, FaucetResponse};
use thiserror::Error;

/// Body used when the concrete failure must not reach the caller.
pub const GENERIC_SERVER_ERROR: &str = "server error";

/// Body used for configuration failures, which may involve the secret.
pub const GENERIC_CONFIG_ERROR: &str = "faucet is not configured";

/// Faucet server error types
#[derive(Error, Debug)]
pub enum FaucetError {
    /// Missing or malformed input, answered with 400
    #[error("{0}")]
    Validation(String),

    /// Missing or unusable credential or endpoint
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The node could not be reached or refused the transaction
    #[error("{0}")]
    Transfer(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AddressError> for FaucetError {
    fn from(err: AddressError) -> Self {
        FaucetError::Validation(err.to_string())
    }
}

impl FaucetError {
    pub fn status(&self) -> StatusCode {
        match self {
            FaucetError::Validation(_) => StatusCode::BAD_REQUEST,
            FaucetError::Configuration(_)
            | FaucetError::Transfer(_)
            | FaucetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FaucetError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_message = match self {
            FaucetError::Validation(message) | FaucetError::Transfer(message) => message,
            FaucetError::Configuration(_) => GENERIC_CONFIG_ERROR.to_string(),
            FaucetError::Internal(_) => GENERIC_SERVER_ERROR.to_string(),
        };

        (status, Json(FaucetResponse::failed(error_message))).into_response()
    }
}

/// Result type alias for faucet operations
pub type FaucetResult<T> = Result<T, FaucetError>;
