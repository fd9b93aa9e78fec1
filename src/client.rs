//! The `client` module builds query requests and interprets the server's
//! responses.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::encryptor::{new_bucket_encryptor, BucketEncryptor};
use crate::entry::{BreachStatus, BucketEntries, MetadataType};
use crate::errors::{MigpError, Result};
use crate::hasher::{new_bucket_hasher, BucketHasher};
use crate::oprf::{BlindingState, OprfSuite};
use crate::server::ServerResponse;
use crate::slow_hasher::{new_slow_hasher, SlowHasher};
use crate::utils::{
  base64_bytes, bucket_hash_to_id, bucket_id_to_hex, serialize_user_password,
};

/// `ClientRequest` is the message a client sends to the server's
/// evaluation endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRequest {
  #[serde(rename = "version")]
  pub version: u32,
  #[serde(rename = "bucketID")]
  pub bucket_id: String,
  #[serde(rename = "blindElement", with = "base64_bytes")]
  pub blind_element: Vec<u8>,
}

/// A `Client` is immutable once built and may be shared between threads;
/// per-query state lives in the `ClientRequestContext` each request
/// returns.
#[derive(Clone)]
pub struct Client {
  config: Config,
  suite: OprfSuite,
  bucket_hasher: Arc<dyn BucketHasher>,
  slow_hasher: Arc<dyn SlowHasher>,
  bucket_encryptor: Arc<dyn BucketEncryptor>,
}

impl Client {
  pub fn new(config: &Config) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      config: config.clone(),
      suite: OprfSuite::try_from(config.oprf_suite)?,
      bucket_hasher: Arc::from(new_bucket_hasher(config.bucket_hasher)?),
      slow_hasher: Arc::from(new_slow_hasher(config.slow_hasher)?),
      bucket_encryptor: Arc::from(new_bucket_encryptor(
        config.bucket_encryptor,
      )?),
    })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn suite(&self) -> OprfSuite {
    self.suite
  }

  /// Returns the identifier of the bucket holding `username`'s entries.
  pub fn bucket_id(&self, username: &[u8]) -> Result<u32> {
    let digest = self.bucket_hasher.hash(username)?;
    bucket_hash_to_id(&digest, self.config.bucket_id_bit_size)
  }

  /// Builds the request for (`username`, `password`) and the context
  /// needed to finalize the response.
  pub fn request(
    &self,
    username: &[u8],
    password: &[u8],
  ) -> Result<(ClientRequest, ClientRequestContext)> {
    let bucket_id = bucket_id_to_hex(self.bucket_id(username)?);
    let serialized = serialize_user_password(username, password)?;
    let input = self.slow_hasher.hash(&serialized)?;
    let (state, blind_element) =
      BlindingState::blind(&input, &mut rand_core::OsRng)?;
    debug!(bucket_id = %bucket_id, "built query request");

    let version = u32::from(self.config.version);
    Ok((
      ClientRequest {
        version,
        bucket_id,
        blind_element,
      },
      ClientRequestContext {
        version,
        state,
        bucket_encryptor: Arc::clone(&self.bucket_encryptor),
      },
    ))
  }
}

/// `ClientRequestContext` holds the blinding state of one request and is
/// consumed by `finalize`.
pub struct ClientRequestContext {
  version: u32,
  state: BlindingState,
  bucket_encryptor: Arc<dyn BucketEncryptor>,
}

impl ClientRequestContext {
  /// Recovers the entry secret from `response` and scans the returned
  /// bucket for an entry keyed by it, returning the breach status and the
  /// entry's metadata.
  pub fn finalize(
    self,
    response: &ServerResponse,
  ) -> Result<(BreachStatus, Vec<u8>)> {
    if response.version != self.version {
      return Err(MigpError::VersionMismatch {
        expected: self.version,
        received: response.version,
      });
    }
    let secret = self.state.finalize(&response.evaluated_element)?;

    for entry in BucketEntries::new(&response.bucket_contents) {
      let (header, body) = entry?;
      let header = self.bucket_encryptor.decrypt_header(&secret, header)?;
      if !header.key_check_ok {
        continue;
      }
      let flag = MetadataType::try_from(header.flag)?;
      let metadata = self.bucket_encryptor.decrypt_body(&secret, body)?;
      debug!(status = %flag.to_breach_status(), "matched bucket entry");
      return Ok((flag.to_breach_status(), metadata));
    }
    Ok((BreachStatus::NotInBreach, Vec::new()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ServerConfig, SLOW_HASHER_NULL};
  use crate::entry::KEY_CHECK_SIZE;
  use crate::server::Server;
  use crate::store::{BucketStore, MemoryBucketStore};

  fn test_config() -> Config {
    Config {
      slow_hasher: SLOW_HASHER_NULL,
      ..Config::default()
    }
  }

  #[test]
  fn request_fields() {
    let client = Client::new(&test_config()).unwrap();
    let (req, _) = client.request(b"alice", b"hunter2").unwrap();
    assert_eq!(req.version, 1);
    assert_eq!(req.bucket_id, "000aee1f");
    assert_eq!(req.blind_element.len(), client.suite().element_len());
  }

  #[test]
  fn request_json_field_names() {
    let req = ClientRequest {
      version: 1,
      bucket_id: "000aee1f".into(),
      blind_element: vec![1, 2, 3],
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "version": 1,
        "bucketID": "000aee1f",
        "blindElement": "AQID",
      })
    );
    let back: ClientRequest = serde_json::from_value(json).unwrap();
    assert_eq!(back, req);
  }

  #[test]
  fn bucket_id_respects_bit_size() {
    let cfg = Config {
      bucket_id_bit_size: 0,
      ..test_config()
    };
    let client = Client::new(&cfg).unwrap();
    assert_eq!(client.bucket_id(b"alice").unwrap(), 0);
    let client = Client::new(&test_config()).unwrap();
    assert_eq!(client.bucket_id(b"alice").unwrap(), 0xaee1f);
  }

  #[test]
  fn invalid_config_is_rejected() {
    let cfg = Config {
      bucket_hasher: 9,
      ..test_config()
    };
    assert!(Client::new(&cfg).is_err());
  }

  #[test]
  fn finalize_rejects_wrong_version() {
    let client = Client::new(&test_config()).unwrap();
    let (_, ctx) = client.request(b"alice", b"hunter2").unwrap();
    let response = ServerResponse {
      version: 2,
      evaluated_element: vec![0; 33],
      bucket_contents: Vec::new(),
    };
    assert!(matches!(
      ctx.finalize(&response),
      Err(MigpError::VersionMismatch {
        expected: 1,
        received: 2
      })
    ));
  }

  #[test]
  fn finalize_rejects_unknown_flag_under_matching_key() {
    let cfg = ServerConfig::generate(test_config()).unwrap();
    let server = Server::new(&cfg).unwrap();
    let mut entry = server
      .encrypt_bucket_entry(
        b"alice",
        b"hunter2",
        MetadataType::BreachedPassword,
        b"breach-A",
      )
      .unwrap();
    // the flag byte is XORed with the pad, so this turns flag 1 into 9
    entry[KEY_CHECK_SIZE] ^= MetadataType::BreachedPassword as u8 ^ 9;
    let store = MemoryBucketStore::new();
    store
      .append(&server.bucket_id_hex(b"alice").unwrap(), &entry)
      .unwrap();

    let client = Client::new(server.config()).unwrap();
    let (req, ctx) = client.request(b"alice", b"hunter2").unwrap();
    let resp = server.handle_request(&req, &store).unwrap();
    assert!(matches!(
      ctx.finalize(&resp),
      Err(MigpError::InvalidMetadataFlag(9))
    ));

    // other passwords fail the key check and never read the flag
    let (req, ctx) = client.request(b"alice", b"hunter3").unwrap();
    let resp = server.handle_request(&req, &store).unwrap();
    assert_eq!(
      ctx.finalize(&resp).unwrap(),
      (BreachStatus::NotInBreach, Vec::new())
    );
  }
}
