mod breaches;
mod configs;
mod s3;

use std::io::{Error, ErrorKind};
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, App, HttpResponse, HttpServer};
use migp::store::MemoryBucketStore;
use migp::Server;
use migp_api::errors::ApiError;
use migp_api::ingest::{IngestOptions, Ingestor};
use migp_api::rpc::{ErrorResponse, EVALUATE_CONTENT_TYPE, WELCOME_MESSAGE};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct ServerState {
  server: Arc<Server>,
  store: Arc<MemoryBucketStore>,
}

fn startup_error<E: std::fmt::Display>(e: E) -> Error {
  Error::new(ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let confs = configs::get_env_configs().map_err(startup_error)?;
  info!("Init instance with configs: {:?}", confs);

  let migp_config = breaches::load_server_config(confs.config_path.as_deref())
    .map_err(startup_error)?;
  if confs.dump_config {
    println!(
      "{}",
      serde_json::to_string(&migp_config).map_err(startup_error)?
    );
    return Ok(());
  }

  let server = Arc::new(Server::new(&migp_config).map_err(startup_error)?);
  let store = Arc::new(MemoryBucketStore::new());
  let ingestor = Ingestor::new(
    server.clone(),
    store.clone(),
    IngestOptions {
      num_variants: confs.num_variants,
      include_username_variant: confs.username_variant,
    },
  );
  let report = breaches::ingest_breach_file(&confs, &ingestor)
    .await
    .map_err(startup_error)?;
  info!(
    "Loaded {} credentials into {} buckets ({} failures)",
    report.successes,
    store.bucket_count().map_err(startup_error)?,
    report.failures
  );

  let server_state = ServerState { server, store };

  info!("Starting MIGP server on port {}", confs.port);
  HttpServer::new(move || {
    let cors = Cors::permissive();

    App::new()
      .app_data(web::Data::new(server_state.clone()))
      .app_data(web::PayloadConfig::new(65_536))
      .wrap(cors)
      .service(index)
      .service(config)
      .service(evaluate)
  })
  .bind("0.0.0.0:".to_string() + &confs.port)?
  .run()
  .await
}

#[get("/")]
async fn index() -> &'static str {
  WELCOME_MESSAGE
}

#[get("/config")]
async fn config(data: web::Data<ServerState>) -> HttpResponse {
  HttpResponse::Ok().json(data.server.config())
}

#[post("/evaluate")]
async fn evaluate(
  body: web::Bytes,
  data: web::Data<ServerState>,
) -> HttpResponse {
  match breaches::respond_to_query(&body, &data.server, data.store.as_ref()) {
    Ok(resp) => HttpResponse::Ok()
      .content_type(EVALUATE_CONTENT_TYPE)
      .body(resp),
    Err(e) => error_response(&e),
  }
}

fn error_response(e: &ApiError) -> HttpResponse {
  warn!("Query failed: {}", e);
  let resp = ErrorResponse::from_error(e);
  let status = StatusCode::from_u16(resp.code)
    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
  HttpResponse::build(status).json(resp)
}
