//! The `errors` module defines the error type returned by every fallible
//! operation in the protocol core.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MigpError>;

// MigpError encapsulates the failure cases of the protocol core. None of
// them are retried internally: every error is returned to the immediate
// caller (client or server orchestration).
#[derive(Debug, Error)]
pub enum MigpError {
  // configuration errors, detected at construction or insertion time
  #[error("Unsupported bucket hasher identifier: {0:#06x}")]
  UnsupportedBucketHasher(u16),
  #[error("Unsupported slow hasher identifier: {0:#06x}")]
  UnsupportedSlowHasher(u16),
  #[error("Unsupported bucket encryptor identifier: {0:#06x}")]
  UnsupportedBucketEncryptor(u16),
  #[error("Unsupported OPRF suite identifier: {0:#06x}")]
  UnsupportedOprfSuite(u16),
  #[error("Bucket ID bit size ({0}) cannot be greater than 32")]
  BucketIdBitSize(u32),
  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
  #[error("Invalid metadata flag value: {0}")]
  InvalidMetadataFlag(u8),

  // protocol mismatch errors
  #[error("Version mismatch: expected {expected}, received {received}")]
  VersionMismatch { expected: u32, received: u32 },

  // malformed input errors
  #[error("Ciphertext of insufficient length to parse header: {0} bytes")]
  TruncatedCiphertext(usize),
  #[error("Bucket ID not valid fixed-width hex: {0:?}")]
  InvalidBucketId(String),
  #[error(
    "Too few bytes to deserialize evaluated element: need {expected}, got {actual}"
  )]
  TruncatedResponse { expected: usize, actual: usize },
  #[error("Parsing error in bucket at offset {offset}: {reason}")]
  MalformedBucket { offset: usize, reason: String },
  #[error("Field of {0} bytes is too long for a two-byte length prefix")]
  FieldTooLong(usize),
  #[error("Bucket hash of {0} bytes is too short to derive a bucket ID")]
  ShortBucketHash(usize),
  #[error("Invalid OPRF private key: {0}")]
  InvalidPrivateKey(String),

  // cryptographic failures
  #[error("Error occurred deriving key material: {0}")]
  KeyDerivation(String),
  #[error("Error occurred during slow hashing: {0}")]
  SlowHash(String),
  #[error("Error occurred during operation of OPRF: {0:?}")]
  Oprf(voprf::Error),

  // collaborator failures
  #[error("Error occurred in bucket store: {0}")]
  Store(String),
  #[error("Error occurred in transport: {0}")]
  Transport(String),
}

impl From<voprf::Error> for MigpError {
  fn from(e: voprf::Error) -> Self {
    MigpError::Oprf(e)
  }
}

impl MigpError {
  /// Returns `true` for errors caused by the peer's input rather than by
  /// local configuration or an internal failure.
  pub fn is_client_error(&self) -> bool {
    matches!(
      self,
      MigpError::VersionMismatch { .. }
        | MigpError::InvalidBucketId(_)
        | MigpError::TruncatedCiphertext(_)
        | MigpError::TruncatedResponse { .. }
        | MigpError::MalformedBucket { .. }
        | MigpError::FieldTooLong(_)
        | MigpError::Oprf(_)
    )
  }
}
