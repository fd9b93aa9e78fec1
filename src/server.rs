//! The `server` module holds the OPRF key, encrypts bucket entries at
//! ingestion time and answers client requests.

use tracing::debug;

use crate::client::ClientRequest;
use crate::config::{Config, ServerConfig};
use crate::encryptor::{new_bucket_encryptor, BucketEncryptor};
use crate::entry::MetadataType;
use crate::errors::{MigpError, Result};
use crate::hasher::{new_bucket_hasher, BucketHasher};
use crate::oprf::{OprfEvaluator, OprfSuite};
use crate::slow_hasher::{new_slow_hasher, SlowHasher};
use crate::store::BucketStore;
use crate::utils::{
  bucket_hash_to_id, bucket_id_to_hex, serialize_user_password,
  validate_bucket_id_hex,
};

/// `ServerResponse` is the answer to a `ClientRequest`. On the wire it is
/// `<4-byte big-endian version> | <evaluated element> | <bucket contents>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerResponse {
  pub version: u32,
  pub evaluated_element: Vec<u8>,
  pub bucket_contents: Vec<u8>,
}

impl ServerResponse {
  pub fn to_bytes(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(
      4 + self.evaluated_element.len() + self.bucket_contents.len(),
    );
    out.extend_from_slice(&self.version.to_be_bytes());
    out.extend_from_slice(&self.evaluated_element);
    out.extend_from_slice(&self.bucket_contents);
    out
  }

  /// Parses a response whose evaluated element has the length fixed by
  /// `suite`; every remaining byte is bucket contents.
  pub fn from_bytes(data: &[u8], suite: OprfSuite) -> Result<Self> {
    let element_len = suite.element_len();
    if data.len() < 4 + element_len {
      return Err(MigpError::TruncatedResponse {
        expected: 4 + element_len,
        actual: data.len(),
      });
    }
    let (version, rest) = data.split_at(4);
    let (evaluated_element, bucket_contents) = rest.split_at(element_len);
    let mut version_bytes = [0u8; 4];
    version_bytes.copy_from_slice(version);
    Ok(Self {
      version: u32::from_be_bytes(version_bytes),
      evaluated_element: evaluated_element.to_vec(),
      bucket_contents: bucket_contents.to_vec(),
    })
  }
}

/// A `Server` is immutable once built. Bucket storage is not part of it:
/// callers pass the store to each operation that needs one.
pub struct Server {
  config: Config,
  evaluator: OprfEvaluator,
  bucket_hasher: Box<dyn BucketHasher>,
  slow_hasher: Box<dyn SlowHasher>,
  bucket_encryptor: Box<dyn BucketEncryptor>,
}

impl Server {
  pub fn new(config: &ServerConfig) -> Result<Self> {
    config.config.validate()?;
    Ok(Self {
      config: config.config.clone(),
      evaluator: OprfEvaluator::new(&config.private_key)?,
      bucket_hasher: new_bucket_hasher(config.config.bucket_hasher)?,
      slow_hasher: new_slow_hasher(config.config.slow_hasher)?,
      bucket_encryptor: new_bucket_encryptor(config.config.bucket_encryptor)?,
    })
  }

  /// Returns the public configuration, safe to publish to clients.
  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn bucket_id(&self, username: &[u8]) -> Result<u32> {
    let digest = self.bucket_hasher.hash(username)?;
    bucket_hash_to_id(&digest, self.config.bucket_id_bit_size)
  }

  pub fn bucket_id_hex(&self, username: &[u8]) -> Result<String> {
    Ok(bucket_id_to_hex(self.bucket_id(username)?))
  }

  /// Encrypts `metadata` under the entry secret of (`username`,
  /// `password`), computed directly with the private key.
  pub fn encrypt_bucket_entry(
    &self,
    username: &[u8],
    password: &[u8],
    flag: MetadataType,
    metadata: &[u8],
  ) -> Result<Vec<u8>> {
    let serialized = serialize_user_password(username, password)?;
    let input = self.slow_hasher.hash(&serialized)?;
    let secret = self.evaluator.full_evaluate(&input)?;
    self.bucket_encryptor.encrypt(&secret, flag, metadata)
  }

  /// Evaluates the request's blinded element and returns it together with
  /// the contents of the requested bucket.
  pub fn handle_request(
    &self,
    request: &ClientRequest,
    store: &dyn BucketStore,
  ) -> Result<ServerResponse> {
    let version = u32::from(self.config.version);
    if request.version != version {
      return Err(MigpError::VersionMismatch {
        expected: version,
        received: request.version,
      });
    }
    let evaluated_element =
      self.evaluator.evaluate_blinded(&request.blind_element)?;
    validate_bucket_id_hex(&request.bucket_id)?;
    let bucket_contents = store.get(&request.bucket_id)?;
    debug!(
      bucket_id = %request.bucket_id,
      bucket_len = bucket_contents.len(),
      "handled query request"
    );
    Ok(ServerResponse {
      version,
      evaluated_element,
      bucket_contents,
    })
  }
}
