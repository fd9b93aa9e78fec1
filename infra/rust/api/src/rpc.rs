//! The `rpc` module fixes the HTTP surface shared by the server and the
//! client: endpoint paths, the JSON error body, and the record the client
//! prints for each query.
//!
//! | Method | Path        | Request body         | Response body           |
//! |--------|-------------|----------------------|-------------------------|
//! | GET    | `/`         |                      | welcome text            |
//! | GET    | `/config`   |                      | JSON `Config`           |
//! | POST   | `/evaluate` | JSON `ClientRequest` | binary `ServerResponse` |
//!
//! Failed requests are answered with an `ErrorResponse`.

use migp::BreachStatus;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

pub const INDEX_PATH: &str = "/";
pub const CONFIG_PATH: &str = "/config";
pub const EVALUATE_PATH: &str = "/evaluate";

pub const WELCOME_MESSAGE: &str = "Welcome to the MIGP demo server\n";

pub const EVALUATE_CONTENT_TYPE: &str = "application/octet-stream";

/// Joins `target` and an endpoint path.
pub fn endpoint_url(target: &str, path: &str) -> String {
  format!("{}{}", target.trim_end_matches('/'), path)
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
  pub code: u16,
  pub message: String,
}

impl ErrorResponse {
  pub const BAD_REQUEST: u16 = 400;
  pub const INTERNAL: u16 = 500;

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self {
      code: Self::BAD_REQUEST,
      message: message.into(),
    }
  }

  pub fn internal() -> Self {
    Self {
      code: Self::INTERNAL,
      message: "Failed to respond to query".into(),
    }
  }

  /// Maps a request-handling error to a response. Internal failures are
  /// not described to the client.
  pub fn from_error(e: &ApiError) -> Self {
    if e.is_client_error() {
      Self::bad_request(e.to_string())
    } else {
      Self::internal()
    }
  }
}

/// `QueryRecord` is one line of client output. Byte fields that are not
/// UTF-8 are printed lossily.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
  pub username: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub password: String,
  pub status: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub metadata: String,
}

impl QueryRecord {
  pub fn new(
    username: &[u8],
    password: Option<&[u8]>,
    status: BreachStatus,
    metadata: &[u8],
  ) -> Self {
    Self {
      username: String::from_utf8_lossy(username).into_owned(),
      password: String::from_utf8_lossy(password.unwrap_or_default())
        .into_owned(),
      status: status.to_string(),
      metadata: String::from_utf8_lossy(metadata).into_owned(),
    }
  }
}
