//! `migp` implements a privacy-preserving lookup of credentials in a
//! breach corpus.
//!
//! A client learns whether a (username, password) pair, or a close
//! variant of the password, appears in a server's breach corpus. The
//! password is hidden from the server by an OPRF exchange; the username is
//! only revealed through the coarse bucket it hashes into. Each bucket
//! holds key-committing encrypted entries that only the matching
//! credential can recognize and decrypt.
//!
//! ```
//! use migp::config::{Config, ServerConfig, SLOW_HASHER_NULL};
//! use migp::entry::{BreachStatus, MetadataType};
//! use migp::store::{BucketStore, MemoryBucketStore};
//! use migp::{Client, Server};
//!
//! let config = ServerConfig::generate(Config {
//!   slow_hasher: SLOW_HASHER_NULL,
//!   ..Config::default()
//! })
//! .unwrap();
//! let server = Server::new(&config).unwrap();
//! let store = MemoryBucketStore::new();
//!
//! let entry = server
//!   .encrypt_bucket_entry(
//!     b"alice",
//!     b"hunter2",
//!     MetadataType::BreachedPassword,
//!     b"breach-A",
//!   )
//!   .unwrap();
//! store
//!   .append(&server.bucket_id_hex(b"alice").unwrap(), &entry)
//!   .unwrap();
//!
//! let client = Client::new(server.config()).unwrap();
//! let (request, context) = client.request(b"alice", b"hunter2").unwrap();
//! let response = server.handle_request(&request, &store).unwrap();
//! let (status, metadata) = context.finalize(&response).unwrap();
//! assert_eq!(status, BreachStatus::InBreach);
//! assert_eq!(metadata, b"breach-A");
//! ```

pub mod client;
pub mod config;
pub mod encryptor;
pub mod entry;
pub mod errors;
pub mod hasher;
pub mod mutator;
pub mod oprf;
pub mod server;
pub mod slow_hasher;
pub mod store;
pub mod transport;
pub mod utils;

pub use client::{Client, ClientRequest, ClientRequestContext};
pub use config::{Config, ServerConfig};
pub use entry::{BreachStatus, MetadataType};
pub use errors::{MigpError, Result};
pub use server::{Server, ServerResponse};
