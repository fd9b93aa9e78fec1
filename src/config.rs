//! The `config` module holds the protocol configuration shared by
//! clients and servers. Both sides must agree on every field for queries
//! to match stored entries.

use serde::{Deserialize, Serialize};

use crate::encryptor::BucketEncryptorId;
use crate::errors::{MigpError, Result};
use crate::hasher::BucketHasherId;
use crate::oprf::{OprfKey, OprfSuite};
use crate::slow_hasher::SlowHasherId;

/// Version of the library and parameter set. Compatibility across
/// versions is not guaranteed.
pub const DEFAULT_MIGP_VERSION: u16 = 1;

/// Number of high-order bits of the bucket hash used as the bucket
/// identifier.
pub const DEFAULT_BUCKET_ID_BIT_SIZE: u32 = 20;

/// Bucket identifiers are stored as a `u32`.
pub const MAX_BUCKET_ID_BIT_SIZE: u32 = 32;

pub const BUCKET_HASHER_SHA256: u16 = 0x0001;
pub const SLOW_HASHER_NULL: u16 = 0x0000;
pub const SLOW_HASHER_SCRYPT: u16 = 0x0001;
pub const BUCKET_ENCRYPTOR_HKDF_SHA256: u16 = 0x0001;
pub const OPRF_SUITE_P256: u16 = 0x0003;

/// `Config` contains the configuration used by both clients and servers.
/// Algorithms are selected by numeric identifier so the structure can be
/// published as plain JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  #[serde(rename = "version")]
  pub version: u16,
  #[serde(rename = "bucketIDBitSize")]
  pub bucket_id_bit_size: u32,
  #[serde(rename = "bucketHasher")]
  pub bucket_hasher: u16,
  #[serde(rename = "slowHasher")]
  pub slow_hasher: u16,
  #[serde(rename = "bucketEncryptor")]
  pub bucket_encryptor: u16,
  #[serde(rename = "oprfSuite")]
  pub oprf_suite: u16,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      version: DEFAULT_MIGP_VERSION,
      bucket_id_bit_size: DEFAULT_BUCKET_ID_BIT_SIZE,
      bucket_hasher: BUCKET_HASHER_SHA256,
      slow_hasher: SLOW_HASHER_SCRYPT,
      bucket_encryptor: BUCKET_ENCRYPTOR_HKDF_SHA256,
      oprf_suite: OPRF_SUITE_P256,
    }
  }
}

impl Config {
  /// Checks every field eagerly, so that unsupported algorithms or an
  /// oversized bucket identifier are reported at construction time rather
  /// than in the middle of a query.
  pub fn validate(&self) -> Result<()> {
    if self.bucket_id_bit_size > MAX_BUCKET_ID_BIT_SIZE {
      return Err(MigpError::BucketIdBitSize(self.bucket_id_bit_size));
    }
    BucketHasherId::try_from(self.bucket_hasher)?;
    SlowHasherId::try_from(self.slow_hasher)?;
    BucketEncryptorId::try_from(self.bucket_encryptor)?;
    OprfSuite::try_from(self.oprf_suite)?;
    Ok(())
  }
}

/// `ServerConfig` is a `Config` plus the server's long-term OPRF private
/// key. It is never sent to clients; publish `ServerConfig::config`
/// instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(flatten)]
  pub config: Config,
  #[serde(rename = "privateKey")]
  pub private_key: OprfKey,
}

impl ServerConfig {
  /// Builds a server configuration with a freshly generated OPRF key.
  pub fn generate(config: Config) -> Result<Self> {
    let suite = OprfSuite::try_from(config.oprf_suite)?;
    let private_key = OprfKey::generate(suite, &mut rand_core::OsRng)?;
    Ok(Self {
      config,
      private_key,
    })
  }

  /// Parses a JSON-serialized server configuration.
  pub fn from_json(data: &[u8]) -> Result<Self> {
    let cfg: ServerConfig = serde_json::from_slice(data)
      .map_err(|e| MigpError::InvalidConfig(e.to_string()))?;
    cfg.config.validate()?;
    Ok(cfg)
  }
}
