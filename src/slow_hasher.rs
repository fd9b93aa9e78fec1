//! The `slow_hasher` module provides the memory-hard stretch applied to
//! serialized credentials before they enter the OPRF.

use scrypt::Params;

use crate::config::{SLOW_HASHER_NULL, SLOW_HASHER_SCRYPT};
use crate::errors::{MigpError, Result};

const SLOW_HASH_SALT: &[u8] = b"MIGP slow hash";

// scrypt work factors: N = 2^14, r = 8, p = 1, 32-byte output.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const SCRYPT_OUTPUT_LEN: usize = 32;

/// Identifiers of the supported slow hashers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlowHasherId {
  Null,
  Scrypt,
}

impl TryFrom<u16> for SlowHasherId {
  type Error = MigpError;

  fn try_from(id: u16) -> Result<Self> {
    match id {
      SLOW_HASHER_NULL => Ok(SlowHasherId::Null),
      SLOW_HASHER_SCRYPT => Ok(SlowHasherId::Scrypt),
      _ => Err(MigpError::UnsupportedSlowHasher(id)),
    }
  }
}

pub trait SlowHasher: Send + Sync {
  fn id(&self) -> u16;
  fn hash(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Identity function, for tests and non-production deployments only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSlowHasher;

impl SlowHasher for NullSlowHasher {
  fn id(&self) -> u16 {
    SLOW_HASHER_NULL
  }

  fn hash(&self, input: &[u8]) -> Result<Vec<u8>> {
    Ok(input.to_vec())
  }
}

#[derive(Clone, Debug)]
pub struct ScryptSlowHasher {
  params: Params,
}

impl ScryptSlowHasher {
  pub fn new() -> Result<Self> {
    let params =
      Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, SCRYPT_OUTPUT_LEN)
        .map_err(|e| MigpError::SlowHash(e.to_string()))?;
    Ok(Self { params })
  }
}

impl SlowHasher for ScryptSlowHasher {
  fn id(&self) -> u16 {
    SLOW_HASHER_SCRYPT
  }

  fn hash(&self, input: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; SCRYPT_OUTPUT_LEN];
    scrypt::scrypt(input, SLOW_HASH_SALT, &self.params, &mut out)
      .map_err(|e| MigpError::SlowHash(e.to_string()))?;
    Ok(out)
  }
}

pub fn new_slow_hasher(id: u16) -> Result<Box<dyn SlowHasher>> {
  match SlowHasherId::try_from(id)? {
    SlowHasherId::Null => Ok(Box::new(NullSlowHasher)),
    SlowHasherId::Scrypt => Ok(Box::new(ScryptSlowHasher::new()?)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::utils::serialize_user_password;
  use hex_literal::hex;

  #[test]
  fn null_hasher_is_identity() {
    let hasher = new_slow_hasher(SLOW_HASHER_NULL).unwrap();
    assert_eq!(hasher.id(), SLOW_HASHER_NULL);
    assert_eq!(hasher.hash(b"").unwrap(), b"");
    assert_eq!(hasher.hash(b"hunter2").unwrap(), b"hunter2");
  }

  #[test]
  fn scrypt_known_answer() {
    let hasher = new_slow_hasher(SLOW_HASHER_SCRYPT).unwrap();
    assert_eq!(hasher.id(), SLOW_HASHER_SCRYPT);
    let input = serialize_user_password(b"alice", b"hunter2").unwrap();
    assert_eq!(input, hex!("0005616c696365000768756e74657232"));
    assert_eq!(
      hasher.hash(&input).unwrap(),
      hex!("d844f8d16f96405283edb5b3b114969d4f8e2b66b1e4cd788f31f1c0f127060b")
    );
  }

  #[test]
  fn unknown_slow_hasher_is_rejected() {
    assert!(matches!(
      new_slow_hasher(0x0009),
      Err(MigpError::UnsupportedSlowHasher(9))
    ));
  }
}
