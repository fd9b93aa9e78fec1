//! The `ingest` module encrypts breached credentials into bucket entries
//! and appends them to a bucket store.

use std::io::BufRead;
use std::sync::Arc;

use migp::mutator::{Mutator, RDasMutator};
use migp::store::BucketStore;
use migp::{MetadataType, Server};
use migp_cli_utils::parse_credential_line;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::errors::ApiError;

pub const DEFAULT_NUM_VARIANTS: usize = 9;

// progress is logged every this many credentials
const PROGRESS_INTERVAL: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestOptions {
  /// Number of similar-password entries stored per credential.
  pub num_variants: usize,
  /// Whether to store a breached-username entry (empty password) per
  /// credential.
  pub include_username_variant: bool,
}

impl Default for IngestOptions {
  fn default() -> Self {
    Self {
      num_variants: DEFAULT_NUM_VARIANTS,
      include_username_variant: true,
    }
  }
}

/// Counts of credentials processed by `Ingestor::ingest_reader`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
  pub successes: usize,
  pub failures: usize,
}

/// An `Ingestor` turns breached credentials into bucket entries.
pub struct Ingestor {
  server: Arc<Server>,
  store: Arc<dyn BucketStore>,
  mutator: RDasMutator,
  options: IngestOptions,
}

impl Ingestor {
  pub fn new(
    server: Arc<Server>,
    store: Arc<dyn BucketStore>,
    options: IngestOptions,
  ) -> Self {
    Self {
      server,
      store,
      mutator: RDasMutator::new(),
      options,
    }
  }

  /// Inserts the entries of one credential, in order: the
  /// breached-password entry, the similar-password entries, then the
  /// breached-username entry if enabled. All carry `metadata`.
  pub fn insert(
    &self,
    username: &[u8],
    password: &[u8],
    metadata: &[u8],
  ) -> Result<(), ApiError> {
    let bucket_id = self.server.bucket_id_hex(username)?;

    let mut plaintexts =
      vec![(password.to_vec(), MetadataType::BreachedPassword)];
    plaintexts.extend(
      self
        .mutator
        .mutate(password, self.options.num_variants)
        .into_iter()
        .map(|variant| (variant, MetadataType::SimilarPassword)),
    );
    if self.options.include_username_variant {
      plaintexts.push((Vec::new(), MetadataType::BreachedUsername));
    }

    let entries = plaintexts
      .par_iter()
      .map(|(pw, flag)| {
        self
          .server
          .encrypt_bucket_entry(username, pw, *flag, metadata)
      })
      .collect::<Result<Vec<Vec<u8>>, _>>()?;

    for entry in entries.iter() {
      self.store.append(&bucket_id, entry)?;
    }
    debug!(
      bucket_id = %bucket_id,
      entries = entries.len(),
      "inserted credential"
    );
    Ok(())
  }

  /// Inserts every `username:password` line of `reader`. Credentials are
  /// taken as raw bytes. Lines without a colon, and credentials that fail
  /// to insert, are counted as failures; only read errors abort ingestion.
  pub fn ingest_reader<R: BufRead>(
    &self,
    reader: R,
    metadata: &[u8],
  ) -> Result<IngestReport, ApiError> {
    let mut report = IngestReport::default();
    for (i, line) in reader.split(b'\n').enumerate() {
      let line = line?;
      let outcome = match parse_credential_line(&line) {
        Some((username, password)) => self.insert(username, password, metadata),
        None => Err(ApiError::CredentialFormat(i + 1)),
      };
      match outcome {
        Ok(()) => report.successes += 1,
        Err(e) => {
          warn!("skipping credential: {}", e);
          report.failures += 1;
        }
      }
      if (i + 1) % PROGRESS_INTERVAL == 0 {
        info!(
          "Encrypting breach entries: {} successes, {} failures",
          report.successes, report.failures
        );
      }
    }
    info!(
      "Encrypted breach entries: {} successes, {} failures",
      report.successes, report.failures
    );
    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use migp::config::{Config, ServerConfig, SLOW_HASHER_NULL};
  use migp::store::MemoryBucketStore;
  use migp::transport::{query_with_client, Transport};
  use migp::{BreachStatus, Client, ClientRequest, MigpError};

  struct Loopback {
    server: Arc<Server>,
    store: Arc<MemoryBucketStore>,
  }

  impl Transport for Loopback {
    fn submit(&self, request: &ClientRequest) -> migp::Result<Vec<u8>> {
      let resp = self.server.handle_request(request, self.store.as_ref())?;
      Ok(resp.to_bytes())
    }
  }

  fn setup(options: IngestOptions) -> (Ingestor, Loopback, Client) {
    let cfg = ServerConfig::generate(Config {
      slow_hasher: SLOW_HASHER_NULL,
      ..Config::default()
    })
    .unwrap();
    let server = Arc::new(Server::new(&cfg).unwrap());
    let store = Arc::new(MemoryBucketStore::new());
    let ingestor = Ingestor::new(server.clone(), store.clone(), options);
    let client = Client::new(&cfg.config).unwrap();
    (ingestor, Loopback { server, store }, client)
  }

  fn check(
    transport: &Loopback,
    client: &Client,
    username: &str,
    password: &str,
  ) -> (BreachStatus, Vec<u8>) {
    query_with_client(
      client,
      transport,
      username.as_bytes(),
      password.as_bytes(),
    )
    .unwrap()
  }

  #[test]
  fn insert_stores_all_variants_in_order() {
    let (ingestor, transport, client) = setup(IngestOptions::default());
    ingestor.insert(b"alice", b"hunter2", b"breach-A").unwrap();

    let bucket = transport
      .store
      .get(&transport.server.bucket_id_hex(b"alice").unwrap())
      .unwrap();
    // 1 + 9 + 1 entries, each with an 8-byte body
    assert_eq!(bucket.len(), 11 * (migp::entry::HEADER_SIZE + 8));

    assert_eq!(
      check(&transport, &client, "alice", "hunter2"),
      (BreachStatus::InBreach, b"breach-A".to_vec())
    );
    assert_eq!(
      check(&transport, &client, "alice", "hunter20").0,
      BreachStatus::SimilarInBreach
    );
    assert_eq!(
      check(&transport, &client, "alice", "").0,
      BreachStatus::UsernameInBreach
    );
    assert_eq!(
      check(&transport, &client, "alice", "hunter3").0,
      BreachStatus::NotInBreach
    );
  }

  #[test]
  fn options_limit_the_entries() {
    let (ingestor, transport, client) = setup(IngestOptions {
      num_variants: 0,
      include_username_variant: false,
    });
    ingestor.insert(b"bob", b"secret", b"").unwrap();
    assert_eq!(
      check(&transport, &client, "bob", "secret").0,
      BreachStatus::InBreach
    );
    assert_eq!(
      check(&transport, &client, "bob", "Secret").0,
      BreachStatus::NotInBreach
    );
    assert_eq!(
      check(&transport, &client, "bob", "").0,
      BreachStatus::NotInBreach
    );
  }

  #[test]
  fn ingest_reader_counts_failures() {
    let (ingestor, transport, client) = setup(IngestOptions::default());
    let input = "alice:hunter2\nmalformed line\ncarol:pa:ss\n";
    let report = ingestor.ingest_reader(input.as_bytes(), b"md").unwrap();
    assert_eq!(
      report,
      IngestReport {
        successes: 2,
        failures: 1
      }
    );
    assert_eq!(
      check(&transport, &client, "carol", "pa:ss"),
      (BreachStatus::InBreach, b"md".to_vec())
    );
  }

  #[test]
  fn ingest_reader_accepts_non_utf8_credentials() {
    let (ingestor, transport, client) = setup(IngestOptions::default());
    let input = b"alice:hunter2\nbob:caf\xe9\ncarol:pw\n";
    let report = ingestor.ingest_reader(&input[..], b"md").unwrap();
    assert_eq!(
      report,
      IngestReport {
        successes: 3,
        failures: 0
      }
    );
    let found =
      query_with_client(&client, &transport, b"bob", b"caf\xe9").unwrap();
    assert_eq!(found, (BreachStatus::InBreach, b"md".to_vec()));
    assert_eq!(
      check(&transport, &client, "carol", "pw"),
      (BreachStatus::InBreach, b"md".to_vec())
    );
  }

  #[test]
  fn oversized_username_is_a_failure() {
    let (ingestor, _, _) = setup(IngestOptions::default());
    let username = vec![b'u'; u16::MAX as usize + 1];
    assert!(matches!(
      ingestor.insert(&username, b"pw", b""),
      Err(ApiError::Protocol(MigpError::FieldTooLong(_)))
    ));
  }
}
