//! The `oprf` module wraps the `voprf` base-mode OPRF over P-256 behind
//! owned secret handles: the server's private key and the client's
//! per-request blinding state never leave their wrappers as raw buffers.

use std::fmt;

use p256::NistP256;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use voprf::{BlindedElement, EvaluationElement, OprfClient, OprfServer};
use zeroize::Zeroizing;

use crate::config::OPRF_SUITE_P256;
use crate::errors::{MigpError, Result};

/// Length of a serialized P-256 group element (SEC1 compressed).
pub const P256_ELEMENT_LEN: usize = 33;

/// Length of a serialized P-256 scalar.
pub const P256_SCALAR_LEN: usize = 32;

/// Length of the OPRF output, i.e. of the secret that keys bucket entries.
pub const OPRF_OUTPUT_LEN: usize = 32;

/// `OprfSuite` enumerates the supported OPRF ciphersuites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OprfSuite {
  P256,
}

impl OprfSuite {
  pub fn id(self) -> u16 {
    match self {
      OprfSuite::P256 => OPRF_SUITE_P256,
    }
  }

  /// Length of a serialized evaluated element for this suite.
  pub fn element_len(self) -> usize {
    match self {
      OprfSuite::P256 => P256_ELEMENT_LEN,
    }
  }
}

impl TryFrom<u16> for OprfSuite {
  type Error = MigpError;

  fn try_from(id: u16) -> Result<Self> {
    match id {
      OPRF_SUITE_P256 => Ok(OprfSuite::P256),
      _ => Err(MigpError::UnsupportedOprfSuite(id)),
    }
  }
}

/// `OprfKey` owns the server's serialized OPRF private key. The bytes are
/// zeroized on drop and never printed.
#[derive(Clone)]
pub struct OprfKey(Zeroizing<Vec<u8>>);

impl OprfKey {
  /// Generates a fresh random key for `suite`.
  pub fn generate<R: RngCore + CryptoRng>(
    suite: OprfSuite,
    rng: &mut R,
  ) -> Result<Self> {
    match suite {
      OprfSuite::P256 => {
        let mut seed = Zeroizing::new([0u8; OPRF_OUTPUT_LEN]);
        rng.fill_bytes(seed.as_mut());
        let server = OprfServer::<NistP256>::new_from_seed(seed.as_ref(), &[])?;
        Ok(Self(Zeroizing::new(server.serialize().to_vec())))
      }
    }
  }

  /// Wraps serialized key bytes, rejecting anything that is not a valid
  /// non-zero scalar.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    if bytes.len() != P256_SCALAR_LEN {
      return Err(MigpError::InvalidPrivateKey(format!(
        "expected {} bytes, got {}",
        P256_SCALAR_LEN,
        bytes.len()
      )));
    }
    OprfServer::<NistP256>::new_with_key(bytes)
      .map_err(|e| MigpError::InvalidPrivateKey(format!("{:?}", e)))?;
    Ok(Self(Zeroizing::new(bytes.to_vec())))
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

impl fmt::Debug for OprfKey {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("OprfKey(<redacted>)")
  }
}

impl Serialize for OprfKey {
  fn serialize<S: Serializer>(
    &self,
    serializer: S,
  ) -> std::result::Result<S::Ok, S::Error> {
    let encoded = Zeroizing::new(base64::encode(self.as_bytes()));
    serializer.serialize_str(&encoded)
  }
}

impl<'de> Deserialize<'de> for OprfKey {
  fn deserialize<D: Deserializer<'de>>(
    deserializer: D,
  ) -> std::result::Result<Self, D::Error> {
    let encoded = Zeroizing::new(String::deserialize(deserializer)?);
    let bytes = Zeroizing::new(
      base64::decode(encoded.as_bytes()).map_err(serde::de::Error::custom)?,
    );
    OprfKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
  }
}

/// `OprfEvaluator` is the server side of the OPRF, bound to one key.
pub struct OprfEvaluator {
  server: OprfServer<NistP256>,
}

impl OprfEvaluator {
  pub fn new(key: &OprfKey) -> Result<Self> {
    let server = OprfServer::<NistP256>::new_with_key(key.as_bytes())
      .map_err(|e| MigpError::InvalidPrivateKey(format!("{:?}", e)))?;
    Ok(Self { server })
  }

  /// Evaluates a serialized blinded element, returning the serialized
  /// evaluated element.
  pub fn evaluate_blinded(&self, blinded: &[u8]) -> Result<Vec<u8>> {
    let blinded = BlindedElement::<NistP256>::deserialize(blinded)?;
    Ok(self.server.blind_evaluate(&blinded).serialize().to_vec())
  }

  /// Computes the OPRF output for `input` directly with the private key,
  /// as used when encrypting bucket entries at ingestion time. The result
  /// equals what a client obtains for the same input through
  /// blind/evaluate/finalize.
  pub fn full_evaluate(&self, input: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let output = self.server.evaluate(input)?;
    Ok(Zeroizing::new(output.to_vec()))
  }
}

/// `BlindingState` is the client's per-request OPRF state. It is consumed
/// by `finalize`, so one blinding can never unblind two responses.
pub struct BlindingState {
  client: OprfClient<NistP256>,
  input: Zeroizing<Vec<u8>>,
}

impl BlindingState {
  /// Blinds `input`, returning the state to keep and the serialized
  /// blinded element to send.
  pub fn blind<R: RngCore + CryptoRng>(
    input: &[u8],
    rng: &mut R,
  ) -> Result<(Self, Vec<u8>)> {
    let res = OprfClient::<NistP256>::blind(input, rng)?;
    let blinded = res.message.serialize().to_vec();
    if blinded.is_empty() {
      return Err(MigpError::Oprf(voprf::Error::Input));
    }
    Ok((
      Self {
        client: res.state,
        input: Zeroizing::new(input.to_vec()),
      },
      blinded,
    ))
  }

  /// Unblinds the server's evaluated element and returns the OPRF output.
  pub fn finalize(self, evaluated: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let evaluated = EvaluationElement::<NistP256>::deserialize(evaluated)?;
    let output = self.client.finalize(&self.input, &evaluated)?;
    Ok(Zeroizing::new(output.to_vec()))
  }
}

impl fmt::Debug for BlindingState {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("BlindingState(<redacted>)")
  }
}
