use anyhow::Error as AnyhowError;
use caryatid_module_rest_server::messages::RESTResponse;
use thiserror::Error;

use crate::{address::AddressError, asset::AssetError};

/// Standard REST error types
#[derive(Debug, Error)]
pub enum RESTError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl RESTError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RESTError::BadRequest(_) => 400,
            RESTError::NotFound(_) => 404,
            RESTError::Conflict(_) => 409,
            RESTError::InternalServerError(_) => 500,
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            RESTError::BadRequest(msg)
            | RESTError::NotFound(msg)
            | RESTError::Conflict(msg)
            | RESTError::InternalServerError(msg) => msg,
        }
    }

    /// Parameter missing error
    pub fn param_missing(param_name: &str) -> Self {
        RESTError::BadRequest(format!("Missing {} parameter", param_name))
    }

    /// Invalid parameter error
    pub fn invalid_param(param_name: &str, reason: &str) -> Self {
        RESTError::BadRequest(format!("Invalid {} parameter: {}", param_name, reason))
    }

    /// The context was already minted
    pub fn already_minted(context_id: &str) -> Self {
        RESTError::Conflict(format!("Already minted for {}", context_id))
    }
}

/// Convert RESTError to RESTResponse
impl From<RESTError> for RESTResponse {
    fn from(error: RESTError) -> Self {
        RESTResponse::with_text(error.status_code(), error.message())
    }
}

/// Convert anyhow::Error to RESTError (default to 500)
impl From<AnyhowError> for RESTError {
    fn from(error: AnyhowError) -> Self {
        RESTError::InternalServerError(error.to_string())
    }
}

/// Convert hex decode errors to RESTError (400 Bad Request)
impl From<hex::FromHexError> for RESTError {
    fn from(error: hex::FromHexError) -> Self {
        RESTError::BadRequest(format!("Invalid hex string: {}", error))
    }
}

/// Malformed request bodies are the caller's fault (400 Bad Request)
impl From<serde_json::Error> for RESTError {
    fn from(error: serde_json::Error) -> Self {
        RESTError::BadRequest(format!("Invalid JSON body: {}", error))
    }
}

impl From<AddressError> for RESTError {
    fn from(error: AddressError) -> Self {
        RESTError::BadRequest(error.to_string())
    }
}

impl From<AssetError> for RESTError {
    fn from(error: AssetError) -> Self {
        RESTError::BadRequest(error.to_string())
    }
}
