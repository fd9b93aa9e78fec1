//! The `errors` module provides the errors exposed to the server and
//! client binaries.

use migp::MigpError;
use thiserror::Error;

// ApiError encapsulates the failure cases of ingestion and of the HTTP
// surface shared by the server and client binaries.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Error occurred in the MIGP protocol: {0}")]
  Protocol(#[from] MigpError),
  #[error("Error occurred reading input: {0}")]
  Io(#[from] std::io::Error),
  #[error("Error occurred during JSON serialization of data: {0}")]
  SerdeJSON(#[from] serde_json::Error),
  #[error("Error occurred parsing credential on line {0}: missing ':'")]
  CredentialFormat(usize),
  #[error("Error occurred loading configuration: {0}")]
  Config(String),
  #[error("Error occurred as server responded with status {0}: {1}")]
  Response(u16, String),
}

impl ApiError {
  /// Returns `true` if the error was caused by the request rather than by
  /// the server.
  pub fn is_client_error(&self) -> bool {
    match self {
      ApiError::Protocol(e) => e.is_client_error(),
      ApiError::SerdeJSON(_) | ApiError::CredentialFormat(_) => true,
      ApiError::Io(_) | ApiError::Config(_) | ApiError::Response(..) => false,
    }
  }
}
