use bytes::Buf;
use std::io::{BufRead, BufReader, Error, ErrorKind};

use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client;
use tracing::info;

const DEFAULT_REGION: &str = "us-west-2";

pub async fn init_client() -> Client {
  let region_provider =
    RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
  let config = aws_config::from_env().region(region_provider).load().await;
  Client::new(&config)
}

/// Downloads the breach file stored under `key` and returns it as a line
/// reader.
pub async fn download_breach_file(
  client: &Client,
  bucket_name: &str,
  key: &str,
) -> Result<Box<dyn BufRead + Send>, Error> {
  info!("downloading breach file s3://{}/{}", bucket_name, key);
  let resp = client
    .get_object()
    .bucket(bucket_name)
    .key(key)
    .send()
    .await
    .map_err(|e| {
      Error::new(
        ErrorKind::Other,
        format!("Err fetching object from S3: {}", e),
      )
    })?;

  let data = resp.body.collect().await.map_err(|e| {
    Error::new(ErrorKind::Other, format!("Err reading body from S3: {}", e))
  })?;

  Ok(Box::new(BufReader::new(data.reader())))
}
