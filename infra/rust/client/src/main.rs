use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use clap::{App, Arg};
use migp::config::{Config, DEFAULT_MIGP_VERSION};
use migp::transport::{query_with_client, Transport};
use migp::{Client, ClientRequest, MigpError};
use migp_api::errors::ApiError;
use migp_api::rpc::{endpoint_url, QueryRecord, CONFIG_PATH, EVALUATE_PATH};
use migp_cli_utils::{open_input, parse_credential_line};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const TARGET_DEFAULT: &str = "http://localhost:8080";

pub struct CliFlags {
  pub target: String,
  pub config_path: Option<String>,
  pub dump_config: bool,
  pub show_password: bool,
  pub infile: String,
}

impl CliFlags {
  pub fn parse_from_cli_flags() -> Self {
    let matches = App::new("MIGP client")
      .version("0.1.0")
      .author("Alex Davidson <coela@alxdavids.xyz>")
      .about("Checks username:password lines against a MIGP server")
      .arg(
        Arg::with_name("target")
          .short("t")
          .long("target")
          .takes_value(true)
          .default_value(TARGET_DEFAULT)
          .help("Target MIGP server"),
      )
      .arg(
        Arg::with_name("config")
          .short("c")
          .long("config")
          .takes_value(true)
          .help("Client config file, JSON or YAML (default: fetch from server)"),
      )
      .arg(
        Arg::with_name("dump_config")
          .long("dump-config")
          .help("Dump the client configuration to stdout and exit"),
      )
      .arg(
        Arg::with_name("show_password")
          .long("show-password")
          .help("Show the password in the output"),
      )
      .arg(
        Arg::with_name("infile")
          .short("i")
          .long("infile")
          .takes_value(true)
          .default_value("-")
          .help("File of <username>:<password> lines ('-' for stdin)"),
      )
      .get_matches();

    Self {
      target: matches.value_of("target").unwrap_or(TARGET_DEFAULT).into(),
      config_path: matches.value_of("config").map(String::from),
      dump_config: matches.is_present("dump_config"),
      show_password: matches.is_present("show_password"),
      infile: matches.value_of("infile").unwrap_or("-").into(),
    }
  }
}

/// Submits requests to a MIGP server's evaluation endpoint over HTTP.
struct HttpTransport {
  client: reqwest::blocking::Client,
  url: String,
}

impl HttpTransport {
  fn new(target: &str) -> Self {
    Self {
      client: reqwest::blocking::Client::new(),
      url: endpoint_url(target, EVALUATE_PATH),
    }
  }
}

impl Transport for HttpTransport {
  fn submit(&self, request: &ClientRequest) -> migp::Result<Vec<u8>> {
    let resp = self
      .client
      .post(&self.url)
      .json(request)
      .send()
      .map_err(|e| MigpError::Transport(e.to_string()))?;
    if !resp.status().is_success() {
      return Err(MigpError::Transport(format!(
        "Request failed with status code {}",
        resp.status().as_u16()
      )));
    }
    let body = resp
      .bytes()
      .map_err(|e| MigpError::Transport(e.to_string()))?;
    Ok(body.to_vec())
  }
}

/// Parses a configuration file, as YAML if its extension says so and as
/// JSON otherwise.
fn parse_config_file(path: &str) -> Result<Config, ApiError> {
  let f = std::fs::File::open(path)?;
  let is_yaml = matches!(
    Path::new(path).extension().and_then(|e| e.to_str()),
    Some("yaml") | Some("yml")
  );
  let config: Config = if is_yaml {
    serde_yaml::from_reader(f).map_err(|e| ApiError::Config(e.to_string()))?
  } else {
    serde_json::from_reader(f)?
  };
  Ok(config)
}

fn fetch_config(target: &str) -> Result<Config, ApiError> {
  let url = endpoint_url(target, CONFIG_PATH);
  let resp = reqwest::blocking::get(&url)
    .map_err(|e| ApiError::Config(format!("{}: {}", url, e)))?;
  let status = resp.status();
  if !status.is_success() {
    return Err(ApiError::Response(
      status.as_u16(),
      format!("unable to retrieve MIGP config from target {:?}", target),
    ));
  }
  resp
    .json()
    .map_err(|e| ApiError::Config(format!("{}: {}", url, e)))
}

fn run(flags: CliFlags) -> Result<(), ApiError> {
  let cfg = match &flags.config_path {
    Some(path) => parse_config_file(path)?,
    None => fetch_config(&flags.target)?,
  };

  if flags.dump_config {
    println!("{}", serde_json::to_string(&cfg)?);
    return Ok(());
  }

  if cfg.version != DEFAULT_MIGP_VERSION {
    warn!(
      "library version {} does not match config version {}, queries may fail",
      DEFAULT_MIGP_VERSION, cfg.version
    );
  }

  let client = Client::new(&cfg)?;
  let transport = HttpTransport::new(&flags.target);
  let reader = open_input(&flags.infile)?;
  check_credentials(
    reader,
    &client,
    &transport,
    flags.show_password,
    &mut io::stdout().lock(),
  )
}

/// Queries every `username:password` line of `reader` and writes one JSON
/// record per credential to `out`. Lines are taken as raw bytes.
fn check_credentials<R: BufRead, T: Transport, W: Write>(
  reader: R,
  client: &Client,
  transport: &T,
  show_password: bool,
  out: &mut W,
) -> Result<(), ApiError> {
  for line in reader.split(b'\n') {
    let line = line?;
    let (username, password) = match parse_credential_line(&line) {
      Some(fields) => fields,
      None => {
        warn!("skipping line without ':'");
        continue;
      }
    };
    let (status, metadata) =
      query_with_client(client, transport, username, password)?;
    let shown = if show_password { Some(password) } else { None };
    let record = QueryRecord::new(username, shown, status, &metadata);
    writeln!(out, "{}", serde_json::to_string(&record)?)?;
  }
  Ok(())
}

fn main() {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  if let Err(e) = run(CliFlags::parse_from_cli_flags()) {
    error!("{}", e);
    process::exit(1);
  }
}
