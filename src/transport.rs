//! The `transport` module defines how a serialized request reaches the
//! server, and runs a complete query over it.

use crate::client::{Client, ClientRequest};
use crate::config::Config;
use crate::entry::BreachStatus;
use crate::errors::Result;
use crate::server::ServerResponse;

/// A `Transport` delivers a request to the server and returns the raw
/// response bytes. Non-success outcomes must be returned as errors. Retry
/// and timeout policy belong to the implementation.
pub trait Transport {
  fn submit(&self, request: &ClientRequest) -> Result<Vec<u8>>;
}

/// Runs one query for (`username`, `password`) against the server behind
/// `transport`.
pub fn query<T: Transport + ?Sized>(
  config: &Config,
  transport: &T,
  username: &[u8],
  password: &[u8],
) -> Result<(BreachStatus, Vec<u8>)> {
  let client = Client::new(config)?;
  query_with_client(&client, transport, username, password)
}

/// As `query`, reusing an already constructed `Client`.
pub fn query_with_client<T: Transport + ?Sized>(
  client: &Client,
  transport: &T,
  username: &[u8],
  password: &[u8],
) -> Result<(BreachStatus, Vec<u8>)> {
  let (request, context) = client.request(username, password)?;
  let body = transport.submit(&request)?;
  let response = ServerResponse::from_bytes(&body, client.suite())?;
  context.finalize(&response)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ServerConfig, SLOW_HASHER_NULL};
  use crate::entry::MetadataType;
  use crate::errors::MigpError;
  use crate::server::Server;
  use crate::store::{BucketStore, MemoryBucketStore};

  struct Loopback {
    server: Server,
    store: MemoryBucketStore,
  }

  impl Transport for Loopback {
    fn submit(&self, request: &ClientRequest) -> Result<Vec<u8>> {
      // exercise the JSON encoding the HTTP transport uses
      let json = serde_json::to_vec(request)
        .map_err(|e| MigpError::Transport(e.to_string()))?;
      let request: ClientRequest = serde_json::from_slice(&json)
        .map_err(|e| MigpError::Transport(e.to_string()))?;
      Ok(self.server.handle_request(&request, &self.store)?.to_bytes())
    }
  }

  struct Failing;

  impl Transport for Failing {
    fn submit(&self, _: &ClientRequest) -> Result<Vec<u8>> {
      Err(MigpError::Transport("status code 500".into()))
    }
  }

  #[test]
  fn query_over_loopback() {
    let cfg = ServerConfig::generate(Config {
      slow_hasher: SLOW_HASHER_NULL,
      ..Config::default()
    })
    .unwrap();
    let transport = Loopback {
      server: Server::new(&cfg).unwrap(),
      store: MemoryBucketStore::new(),
    };
    let entry = transport
      .server
      .encrypt_bucket_entry(
        b"alice",
        b"hunter2",
        MetadataType::BreachedPassword,
        b"breach-A",
      )
      .unwrap();
    let bucket = transport.server.bucket_id_hex(b"alice").unwrap();
    transport.store.append(&bucket, &entry).unwrap();

    let (status, md) =
      query(&cfg.config, &transport, b"alice", b"hunter2").unwrap();
    assert_eq!(status, BreachStatus::InBreach);
    assert_eq!(md, b"breach-A");

    let (status, md) =
      query(&cfg.config, &transport, b"alice", b"hunter3").unwrap();
    assert_eq!(status, BreachStatus::NotInBreach);
    assert!(md.is_empty());
  }

  #[test]
  fn transport_errors_are_surfaced() {
    let cfg = Config {
      slow_hasher: SLOW_HASHER_NULL,
      ..Config::default()
    };
    assert!(matches!(
      query(&cfg, &Failing, b"alice", b"hunter2"),
      Err(MigpError::Transport(_))
    ));
  }
}
