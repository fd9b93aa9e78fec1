//! The `entry` module describes the records stored in a bucket: their
//! metadata flags, the breach status a flag maps to, and the sequential
//! layout of concatenated entries.

use std::fmt;
use std::str::FromStr;

use crate::errors::{MigpError, Result};

/// Length of the key-check segment of an entry header.
pub const KEY_CHECK_SIZE: usize = 20;

/// Length of an entry header: key check, flag and 4-byte body length.
pub const HEADER_SIZE: usize = KEY_CHECK_SIZE + 1 + 4;

/// `MetadataType` is the flag stored alongside each bucket entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MetadataType {
  Dummy = 0,
  BreachedPassword = 1,
  SimilarPassword = 2,
  BreachedUsername = 3,
}

impl MetadataType {
  pub fn to_breach_status(self) -> BreachStatus {
    match self {
      MetadataType::Dummy => BreachStatus::NotInBreach,
      MetadataType::BreachedPassword => BreachStatus::InBreach,
      MetadataType::SimilarPassword => BreachStatus::SimilarInBreach,
      MetadataType::BreachedUsername => BreachStatus::UsernameInBreach,
    }
  }
}

impl TryFrom<u8> for MetadataType {
  type Error = MigpError;

  fn try_from(flag: u8) -> Result<Self> {
    match flag {
      0 => Ok(MetadataType::Dummy),
      1 => Ok(MetadataType::BreachedPassword),
      2 => Ok(MetadataType::SimilarPassword),
      3 => Ok(MetadataType::BreachedUsername),
      _ => Err(MigpError::InvalidMetadataFlag(flag)),
    }
  }
}

impl FromStr for MetadataType {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s {
      "dummy" => Ok(MetadataType::Dummy),
      "breached-password" => Ok(MetadataType::BreachedPassword),
      "similar-password" => Ok(MetadataType::SimilarPassword),
      "breached-username" => Ok(MetadataType::BreachedUsername),
      _ => Err(format!("unknown metadata type: {}", s)),
    }
  }
}

/// `BreachStatus` is the outcome of a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BreachStatus {
  #[default]
  NotInBreach,
  InBreach,
  SimilarInBreach,
  UsernameInBreach,
}

impl fmt::Display for BreachStatus {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let s = match self {
      BreachStatus::NotInBreach => "password not in breach",
      BreachStatus::InBreach => "password in breach",
      BreachStatus::SimilarInBreach => "similar password in breach",
      BreachStatus::UsernameInBreach => "username in breach",
    };
    f.write_str(s)
  }
}

/// `BucketEntries` walks the concatenated entries of a bucket from offset
/// 0, yielding each entry's header and encrypted body. An empty remainder
/// ends iteration. A partial header, or a body length running past the end
/// of the bucket, yields a `MalformedBucket` error and then ends
/// iteration.
pub struct BucketEntries<'a> {
  contents: &'a [u8],
  offset: usize,
  failed: bool,
}

impl<'a> BucketEntries<'a> {
  pub fn new(contents: &'a [u8]) -> Self {
    Self {
      contents,
      offset: 0,
      failed: false,
    }
  }

  fn malformed(
    &mut self,
    reason: String,
  ) -> Option<Result<(&'a [u8], &'a [u8])>> {
    self.failed = true;
    Some(Err(MigpError::MalformedBucket {
      offset: self.offset,
      reason,
    }))
  }
}

impl<'a> Iterator for BucketEntries<'a> {
  type Item = Result<(&'a [u8], &'a [u8])>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None;
    }
    let remaining = &self.contents[self.offset..];
    if remaining.is_empty() {
      return None;
    }
    if remaining.len() < HEADER_SIZE {
      return self.malformed(format!(
        "{} trailing bytes cannot hold a {}-byte header",
        remaining.len(),
        HEADER_SIZE
      ));
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&remaining[KEY_CHECK_SIZE + 1..HEADER_SIZE]);
    let body_len = u32::from_be_bytes(len_bytes) as usize;
    let available = remaining.len() - HEADER_SIZE;
    if body_len > available {
      return self.malformed(format!(
        "body length {} exceeds the {} bytes remaining",
        body_len, available
      ));
    }
    let header = &remaining[..HEADER_SIZE];
    let body = &remaining[HEADER_SIZE..HEADER_SIZE + body_len];
    self.offset += HEADER_SIZE + body_len;
    Some(Ok((header, body)))
  }
}
