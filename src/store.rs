//! The `store` module defines the bucket storage capability the server is
//! given at construction, plus an in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{MigpError, Result};

/// `BucketStore` maps hex bucket identifiers to concatenated entries.
///
/// Implementations must make a write visible to every read that starts
/// after it returns, and must allow reads concurrently with writes.
pub trait BucketStore: Send + Sync {
  /// Returns the contents of the bucket, or an empty vector if the bucket
  /// does not exist.
  fn get(&self, bucket_id: &str) -> Result<Vec<u8>>;

  /// Appends `entry` to the bucket, creating it if needed.
  fn append(&self, bucket_id: &str, entry: &[u8]) -> Result<()>;

  /// Replaces the contents of the bucket.
  fn put(&self, bucket_id: &str, contents: Vec<u8>) -> Result<()>;
}

/// `MemoryBucketStore` keeps every bucket in a map behind a reader-writer
/// lock: lookups share the lock, appends and puts take it exclusively.
#[derive(Debug, Default)]
pub struct MemoryBucketStore {
  buckets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBucketStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of non-empty buckets.
  pub fn bucket_count(&self) -> Result<usize> {
    let buckets = self.buckets.read().map_err(poisoned)?;
    Ok(buckets.len())
  }
}

fn poisoned<T>(_: T) -> MigpError {
  MigpError::Store("bucket lock poisoned".into())
}

impl BucketStore for MemoryBucketStore {
  fn get(&self, bucket_id: &str) -> Result<Vec<u8>> {
    let buckets = self.buckets.read().map_err(poisoned)?;
    Ok(buckets.get(bucket_id).cloned().unwrap_or_default())
  }

  fn append(&self, bucket_id: &str, entry: &[u8]) -> Result<()> {
    let mut buckets = self.buckets.write().map_err(poisoned)?;
    buckets
      .entry(bucket_id.to_string())
      .or_default()
      .extend_from_slice(entry);
    Ok(())
  }

  fn put(&self, bucket_id: &str, contents: Vec<u8>) -> Result<()> {
    let mut buckets = self.buckets.write().map_err(poisoned)?;
    buckets.insert(bucket_id.to_string(), contents);
    Ok(())
  }
}
