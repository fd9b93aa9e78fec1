//! The `encryptor` module provides the key-committing encryption applied
//! to every bucket entry.
//!
//! An entry is laid out as
//!
//! ```text
//! <20-byte key check> <1-byte flag> <4-byte body length> <body>
//! ```
//!
//! where the key check and flag are XORed with a pad derived from the
//! entry secret, the body length is in the clear and the body is XORed
//! with a second, independent pad. The key check decrypts to zero bytes
//! only under the secret that produced the entry.

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::config::BUCKET_ENCRYPTOR_HKDF_SHA256;
use crate::entry::{MetadataType, HEADER_SIZE, KEY_CHECK_SIZE};
use crate::errors::{MigpError, Result};

const PAD_HEADER_SALT: &[u8] = b"MIGP derive pad header";
const PAD_BODY_SALT: &[u8] = b"MIGP derive pad body";

/// Identifiers of the supported bucket encryptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketEncryptorId {
  HkdfSha256,
}

impl TryFrom<u16> for BucketEncryptorId {
  type Error = MigpError;

  fn try_from(id: u16) -> Result<Self> {
    match id {
      BUCKET_ENCRYPTOR_HKDF_SHA256 => Ok(BucketEncryptorId::HkdfSha256),
      _ => Err(MigpError::UnsupportedBucketEncryptor(id)),
    }
  }
}

/// The decrypted header of a bucket entry. `flag` is the raw byte and is
/// only meaningful when `key_check_ok` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryHeader {
  pub key_check_ok: bool,
  pub flag: u8,
  pub body_len: u32,
}

pub trait BucketEncryptor: Send + Sync {
  fn id(&self) -> u16;

  /// Encrypts `body` and `flag` under `secret`, returning a complete entry.
  fn encrypt(
    &self,
    secret: &[u8],
    flag: MetadataType,
    body: &[u8],
  ) -> Result<Vec<u8>>;

  /// Decrypts the header at the start of `ciphertext`.
  fn decrypt_header(
    &self,
    secret: &[u8],
    ciphertext: &[u8],
  ) -> Result<EntryHeader>;

  /// Decrypts an encrypted body. Only meaningful after a header decrypted
  /// under the same secret passed its key check.
  fn decrypt_body(&self, secret: &[u8], body: &[u8]) -> Result<Vec<u8>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HkdfSha256BucketEncryptor;

impl HkdfSha256BucketEncryptor {
  fn derive_pad(
    salt: &[u8],
    secret: &[u8],
    len: usize,
  ) -> Result<Zeroizing<Vec<u8>>> {
    let mut pad = Zeroizing::new(vec![0u8; len]);
    Hkdf::<Sha256>::new(Some(salt), secret)
      .expand(&[], &mut pad)
      .map_err(|_| {
        MigpError::KeyDerivation(format!("cannot expand a {}-byte pad", len))
      })?;
    Ok(pad)
  }
}

fn xor(data: &[u8], pad: &[u8]) -> Vec<u8> {
  data.iter().zip(pad.iter()).map(|(d, p)| d ^ p).collect()
}

impl BucketEncryptor for HkdfSha256BucketEncryptor {
  fn id(&self) -> u16 {
    BUCKET_ENCRYPTOR_HKDF_SHA256
  }

  fn encrypt(
    &self,
    secret: &[u8],
    flag: MetadataType,
    body: &[u8],
  ) -> Result<Vec<u8>> {
    let body_len = u32::try_from(body.len()).map_err(|_| {
      MigpError::KeyDerivation(format!("body of {} bytes", body.len()))
    })?;
    let header_pad =
      Self::derive_pad(PAD_HEADER_SALT, secret, KEY_CHECK_SIZE + 1)?;
    let body_pad = Self::derive_pad(PAD_BODY_SALT, secret, body.len())?;

    let mut header = [0u8; KEY_CHECK_SIZE + 1];
    header[KEY_CHECK_SIZE] = flag as u8;

    let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
    out.extend(xor(&header, &header_pad));
    out.extend_from_slice(&body_len.to_be_bytes());
    out.extend(xor(body, &body_pad));
    Ok(out)
  }

  fn decrypt_header(
    &self,
    secret: &[u8],
    ciphertext: &[u8],
  ) -> Result<EntryHeader> {
    if ciphertext.len() < HEADER_SIZE {
      return Err(MigpError::TruncatedCiphertext(ciphertext.len()));
    }
    let header_pad =
      Self::derive_pad(PAD_HEADER_SALT, secret, KEY_CHECK_SIZE + 1)?;
    let header =
      Zeroizing::new(xor(&ciphertext[..KEY_CHECK_SIZE + 1], &header_pad));

    let key_check_ok: bool =
      header[..KEY_CHECK_SIZE].ct_eq(&[0u8; KEY_CHECK_SIZE]).into();
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&ciphertext[KEY_CHECK_SIZE + 1..HEADER_SIZE]);
    Ok(EntryHeader {
      key_check_ok,
      flag: header[KEY_CHECK_SIZE],
      body_len: u32::from_be_bytes(len_bytes),
    })
  }

  fn decrypt_body(&self, secret: &[u8], body: &[u8]) -> Result<Vec<u8>> {
    let body_pad = Self::derive_pad(PAD_BODY_SALT, secret, body.len())?;
    Ok(xor(body, &body_pad))
  }
}

pub fn new_bucket_encryptor(id: u16) -> Result<Box<dyn BucketEncryptor>> {
  match BucketEncryptorId::try_from(id)? {
    BucketEncryptorId::HkdfSha256 => Ok(Box::new(HkdfSha256BucketEncryptor)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use hex_literal::hex;
  use proptest::prelude::*;

  #[test]
  fn hkdf_sha256_known_answer() {
    let enc = new_bucket_encryptor(BUCKET_ENCRYPTOR_HKDF_SHA256).unwrap();
    let ct = enc
      .encrypt(b"test", MetadataType::BreachedPassword, b"helloworld")
      .unwrap();
    assert_eq!(
      ct,
      hex!("9fdc22dbd8f90f450e96650039eb5a60453b340d5a0000000aaa6b795e951ff5fd6cac")
    );
  }

  #[test]
  fn round_trip() {
    let enc = HkdfSha256BucketEncryptor;
    let secret = [7u8; 32];
    let long = [0xabu8; 300];
    let bodies: [&[u8]; 4] = [b"", b"x", b"breach-A", &long];
    for body in bodies {
      let ct = enc
        .encrypt(&secret, MetadataType::SimilarPassword, body)
        .unwrap();
      assert_eq!(ct.len(), HEADER_SIZE + body.len());
      let header = enc.decrypt_header(&secret, &ct).unwrap();
      assert!(header.key_check_ok);
      assert_eq!(header.flag, MetadataType::SimilarPassword as u8);
      assert_eq!(header.body_len as usize, body.len());
      assert_eq!(enc.decrypt_body(&secret, &ct[HEADER_SIZE..]).unwrap(), body);
    }
  }

  #[test]
  fn truncated_ciphertext_is_rejected() {
    let enc = HkdfSha256BucketEncryptor;
    assert!(matches!(
      enc.decrypt_header(b"secret", &[0u8; HEADER_SIZE - 1]),
      Err(MigpError::TruncatedCiphertext(24))
    ));
  }

  #[test]
  fn oversized_body_is_a_derivation_error() {
    let enc = HkdfSha256BucketEncryptor;
    let body = vec![0u8; 255 * 32 + 1];
    assert!(matches!(
      enc.encrypt(b"secret", MetadataType::Dummy, &body),
      Err(MigpError::KeyDerivation(_))
    ));
    assert!(enc
      .encrypt(b"secret", MetadataType::Dummy, &body[1..])
      .is_ok());
  }

  #[test]
  fn unknown_encryptor_is_rejected() {
    assert!(matches!(
      new_bucket_encryptor(0),
      Err(MigpError::UnsupportedBucketEncryptor(0))
    ));
  }

  proptest! {
    #[test]
    fn wrong_secret_fails_key_check(
      secret in proptest::collection::vec(any::<u8>(), 1..64),
      other in proptest::collection::vec(any::<u8>(), 1..64),
      body in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
      prop_assume!(secret != other);
      let enc = HkdfSha256BucketEncryptor;
      let ct = enc
        .encrypt(&secret, MetadataType::BreachedPassword, &body)
        .unwrap();
      let header = enc.decrypt_header(&other, &ct).unwrap();
      prop_assert!(!header.key_check_ok);
      prop_assert_eq!(header.body_len as usize, body.len());
    }
  }
}
