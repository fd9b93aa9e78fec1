//! The `hasher` module provides the bucket hashers used to map a username
//! to the bucket that stores its entries.

use sha2::{Digest, Sha256};

use crate::config::BUCKET_HASHER_SHA256;
use crate::errors::{MigpError, Result};
use crate::utils::encode_length_prefixed;

const BUCKET_HASH_SALT: &[u8] = b"MIGP bucket";

/// Identifiers of the supported bucket hashers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketHasherId {
  Sha256,
}

impl TryFrom<u16> for BucketHasherId {
  type Error = MigpError;

  fn try_from(id: u16) -> Result<Self> {
    match id {
      BUCKET_HASHER_SHA256 => Ok(BucketHasherId::Sha256),
      _ => Err(MigpError::UnsupportedBucketHasher(id)),
    }
  }
}

pub trait BucketHasher: Send + Sync {
  fn id(&self) -> u16;
  fn hash(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Salted SHA-256 over a length-prefixed encoding of the salt and the
/// input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256BucketHasher;

impl BucketHasher for Sha256BucketHasher {
  fn id(&self) -> u16 {
    BUCKET_HASHER_SHA256
  }

  fn hash(&self, input: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(4 + BUCKET_HASH_SALT.len() + input.len());
    encode_length_prefixed(BUCKET_HASH_SALT, &mut buf)?;
    encode_length_prefixed(input, &mut buf)?;
    Ok(Sha256::digest(&buf).to_vec())
  }
}

pub fn new_bucket_hasher(id: u16) -> Result<Box<dyn BucketHasher>> {
  match BucketHasherId::try_from(id)? {
    BucketHasherId::Sha256 => Ok(Box::new(Sha256BucketHasher)),
  }
}
