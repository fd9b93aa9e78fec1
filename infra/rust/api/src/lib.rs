//! The migp-api crate holds the pieces of a MIGP deployment that sit
//! between the protocol core and the binaries: ingestion of a breach file
//! into encrypted buckets, and the HTTP contract between the server and
//! the client.
//!
//! # Example usage
//!
//! ```
//! # use std::sync::Arc;
//! # use migp::config::{Config, ServerConfig, SLOW_HASHER_NULL};
//! # use migp::store::MemoryBucketStore;
//! # use migp::Server;
//! use migp_api::ingest::{IngestOptions, Ingestor};
//!
//! # let cfg = ServerConfig::generate(Config {
//! #   slow_hasher: SLOW_HASHER_NULL,
//! #   ..Config::default()
//! # }).unwrap();
//! let server = Arc::new(Server::new(&cfg).unwrap());
//! let store = Arc::new(MemoryBucketStore::new());
//! let ingestor = Ingestor::new(server, store, IngestOptions::default());
//!
//! let breach = "alice:hunter2\nbob:letmein\n";
//! let report = ingestor.ingest_reader(breach.as_bytes(), b"breach-A").unwrap();
//! assert_eq!(report.successes, 2);
//! ```

pub mod errors;
pub mod ingest;
pub mod rpc;
