use crate::configs::EnvConfig;
use crate::s3;

use std::fs;
use std::time::Instant;

use migp::config::Config;
use migp::store::BucketStore;
use migp::{ClientRequest, Server, ServerConfig};
use migp_api::{
  errors::ApiError,
  ingest::{IngestReport, Ingestor},
};
use migp_cli_utils::open_input;
use tracing::{debug, info};

/// Reads the server configuration from `path`, or generates a default
/// one with a fresh OPRF key.
pub fn load_server_config(
  path: Option<&str>,
) -> Result<ServerConfig, ApiError> {
  match path {
    Some(p) => {
      info!("reading server config from {}", p);
      let data = fs::read(p)?;
      Ok(ServerConfig::from_json(&data)?)
    }
    None => {
      info!("no server config provided, generating a fresh key");
      Ok(ServerConfig::generate(Config::default())?)
    }
  }
}

/// Loads the breach file named by `confs` into the ingestor's store: from
/// S3 on release, from the local filesystem or stdin otherwise.
pub async fn ingest_breach_file(
  confs: &EnvConfig,
  ingestor: &Ingestor,
) -> Result<IngestReport, ApiError> {
  let start = Instant::now();
  let report = if confs.release {
    let s3_client = s3::init_client().await;
    let reader =
      s3::download_breach_file(&s3_client, &confs.bucket, &confs.infile)
        .await?;
    ingestor.ingest_reader(reader, confs.metadata.as_bytes())?
  } else {
    info!("reading breach entries from {} (local build)", confs.infile);
    let reader = open_input(&confs.infile)?;
    ingestor.ingest_reader(reader, confs.metadata.as_bytes())?
  };
  info!("breach file ingested in {:?}", start.elapsed());
  Ok(report)
}

/// Answers a JSON-encoded `ClientRequest` with a binary `ServerResponse`.
pub fn respond_to_query(
  client_payload: &[u8],
  server: &Server,
  store: &dyn BucketStore,
) -> Result<Vec<u8>, ApiError> {
  let request: ClientRequest = serde_json::from_slice(client_payload)?;
  debug!("respond to query for bucket {}", request.bucket_id);
  let response = server.handle_request(&request, store)?;
  Ok(response.to_bytes())
}
