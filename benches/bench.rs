use criterion::{criterion_group, criterion_main, BenchmarkGroup, Criterion};
use migp::config::{Config, ServerConfig, SLOW_HASHER_NULL};
use migp::encryptor::{BucketEncryptor, HkdfSha256BucketEncryptor};
use migp::entry::MetadataType;
use migp::hasher::{BucketHasher, Sha256BucketHasher};
use migp::mutator::{Mutator, RDasMutator};
use migp::store::{BucketStore, MemoryBucketStore};
use migp::utils::bucket_hash_to_id;
use migp::{Client, Server};
use migp_cli_utils::*;

const BENCH_PRIMITIVES: bool = true;
const BENCH_QUERY: bool = true;

fn criterion_benchmark(c: &mut Criterion) {
  let BenchFlags {
    bucket_id_bit_size,
    bucket_entries,
    num_variants,
    metadata_len,
  } = parse_from_env();
  let mut migp_group = c.benchmark_group("migp");

  if BENCH_PRIMITIVES {
    _bench_primitives(
      &mut migp_group,
      bucket_id_bit_size,
      num_variants,
      metadata_len,
    );
  }
  if BENCH_QUERY {
    println!("Setting up bucket for benchmarking. This might take a while...");
    let cfg = ServerConfig::generate(Config {
      bucket_id_bit_size,
      slow_hasher: SLOW_HASHER_NULL,
      ..Config::default()
    })
    .unwrap();
    let server = Server::new(&cfg).unwrap();
    let store = MemoryBucketStore::new();
    let bucket = server.bucket_id_hex(b"alice").unwrap();
    let metadata = bench_utils::generate_metadata(metadata_len);
    for i in 0..bucket_entries {
      let entry = server
        .encrypt_bucket_entry(
          b"alice",
          format!("password{}", i).as_bytes(),
          MetadataType::BreachedPassword,
          &metadata,
        )
        .unwrap();
      store.append(&bucket, &entry).unwrap();
    }
    println!("Setup complete, starting benchmarks");
    _bench_query(&mut migp_group, &server, &store, bucket_entries);
  }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn _bench_primitives(
  c: &mut BenchmarkGroup<criterion::measurement::WallTime>,
  bucket_id_bit_size: u32,
  num_variants: usize,
  metadata_len: usize,
) {
  let hasher = Sha256BucketHasher;
  let encryptor = HkdfSha256BucketEncryptor;
  let secret = [7u8; 32];
  let metadata = bench_utils::generate_metadata(metadata_len);
  let ct = encryptor
    .encrypt(&secret, MetadataType::BreachedPassword, &metadata)
    .unwrap();
  let mutator = RDasMutator::new();

  println!("Starting primitive benchmarks");
  c.bench_function(
    format!("bucket id, bit size: {}", bucket_id_bit_size),
    |b| {
      b.iter(|| {
        let digest = hasher.hash(b"alice@example.com").unwrap();
        bucket_hash_to_id(&digest, bucket_id_bit_size).unwrap();
      });
    },
  );

  c.bench_function(
    format!("encrypt bucket entry, metadata len: {}", metadata_len),
    |b| {
      b.iter(|| {
        encryptor
          .encrypt(&secret, MetadataType::BreachedPassword, &metadata)
          .unwrap();
      });
    },
  );

  c.bench_function("decrypt entry header", |b| {
    b.iter(|| encryptor.decrypt_header(&secret, &ct).unwrap());
  });

  c.bench_function(format!("mutate, variants: {}", num_variants), |b| {
    b.iter(|| mutator.mutate(b"hunter2", num_variants));
  });
  println!("Finished primitive benchmarks");
}

fn _bench_query(
  c: &mut BenchmarkGroup<criterion::measurement::WallTime>,
  server: &Server,
  store: &MemoryBucketStore,
  bucket_entries: usize,
) {
  let client = Client::new(server.config()).unwrap();
  let (req, _) = client.request(b"alice", b"password0").unwrap();
  let resp = server.handle_request(&req, store).unwrap();

  println!("Starting query benchmarks");
  c.bench_function("client request", |b| {
    b.iter(|| client.request(b"alice", b"password0").unwrap());
  });

  c.bench_function(
    format!("server handle request, bucket entries: {}", bucket_entries),
    |b| {
      b.iter(|| server.handle_request(&req, store).unwrap());
    },
  );

  c.bench_function(
    format!("client finalize, bucket entries: {}", bucket_entries),
    |b| {
      b.iter(|| {
        // a fresh context cannot unblind `resp`, so every entry is scanned
        let (_, ctx) = client.request(b"alice", b"missing").unwrap();
        ctx.finalize(&resp).unwrap();
      });
    },
  );
  println!("Finished query benchmarks");
}

mod bench_utils {
  use rand_core::{OsRng, RngCore};
  pub fn generate_metadata(len: usize) -> Vec<u8> {
    let mut md = vec![0u8; len];
    OsRng.fill_bytes(&mut md);
    md
  }
}
