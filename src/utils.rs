//! Encoding helpers shared by clients and servers: the prefix-free
//! serialization of credentials and the bucket addressing scheme.

use bitreader::BitReader;

use crate::config::MAX_BUCKET_ID_BIT_SIZE;
use crate::errors::{MigpError, Result};

/// Width of a hex-encoded bucket identifier.
pub const BUCKET_ID_HEX_LEN: usize = 8;

/// Encodes `data` with a two-byte big-endian length prefix.
pub fn encode_length_prefixed(data: &[u8], out: &mut Vec<u8>) -> Result<()> {
  let len = u16::try_from(data.len())
    .map_err(|_| MigpError::FieldTooLong(data.len()))?;
  out.extend_from_slice(&len.to_be_bytes());
  out.extend_from_slice(data);
  Ok(())
}

/// Serializes a credential pair using a prefix-free length-based encoding,
/// so that ("ab", "c") and ("a", "bc") never collide. Metadata is not part
/// of the serialization.
pub fn serialize_user_password(
  username: &[u8],
  password: &[u8],
) -> Result<Vec<u8>> {
  let mut out = Vec::with_capacity(4 + username.len() + password.len());
  encode_length_prefixed(username, &mut out)?;
  encode_length_prefixed(password, &mut out)?;
  Ok(out)
}

/// Returns the bucket identifier made of the `bit_size` high-order bits of
/// the first four bytes of `bucket_hash`.
pub fn bucket_hash_to_id(bucket_hash: &[u8], bit_size: u32) -> Result<u32> {
  if bit_size > MAX_BUCKET_ID_BIT_SIZE {
    return Err(MigpError::BucketIdBitSize(bit_size));
  }
  if bucket_hash.len() < 4 {
    return Err(MigpError::ShortBucketHash(bucket_hash.len()));
  }
  if bit_size == 0 {
    return Ok(0);
  }
  let mut reader = BitReader::new(&bucket_hash[..4]);
  reader
    .read_u32(bit_size as u8)
    .map_err(|_| MigpError::ShortBucketHash(bucket_hash.len()))
}

/// Encodes a bucket identifier as fixed-width lowercase hex, the key
/// under which buckets are stored.
pub fn bucket_id_to_hex(bucket_id: u32) -> String {
  hex::encode(bucket_id.to_be_bytes())
}

/// Checks that `bucket_id` is a well-formed hex bucket identifier.
pub fn validate_bucket_id_hex(bucket_id: &str) -> Result<()> {
  if bucket_id.len() != BUCKET_ID_HEX_LEN || hex::decode(bucket_id).is_err() {
    return Err(MigpError::InvalidBucketId(bucket_id.into()));
  }
  Ok(())
}

/// Serde adapter for byte fields carried as base64 strings in JSON.
pub mod base64_bytes {
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(
    bytes: &[u8],
    serializer: S,
  ) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::encode(bytes))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> std::result::Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    base64::decode(s).map_err(serde::de::Error::custom)
  }
}
