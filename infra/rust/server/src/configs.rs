use std::{env, fmt};

use migp_api::ingest::DEFAULT_NUM_VARIANTS;

pub const ENV_LOCAL: &str = "local";
pub const ENV_RELEASE: &str = "release";

const DEFAULT_PORT: &str = "8080";
const DEFAULT_INFILE: &str = "-";

/// Process configuration of the server, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
  pub port: String,
  /// Path of a JSON `ServerConfig`; a fresh one is generated if unset.
  pub config_path: Option<String>,
  /// Breach file of `username:password` lines. A local path (`-` for
  /// stdin) when running locally, an object key in `bucket` on release.
  pub infile: String,
  pub metadata: String,
  pub num_variants: usize,
  pub username_variant: bool,
  pub dump_config: bool,
  pub bucket: String,
  pub release: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfigErr {
  reason: String,
}

impl fmt::Display for ServerConfigErr {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Server configs error: {}", self.reason)
  }
}

impl std::error::Error for ServerConfigErr {}

impl ServerConfigErr {
  fn throw(reason: &str) -> Self {
    Self {
      reason: reason.to_string(),
    }
  }
}

pub fn get_env_configs() -> Result<EnvConfig, ServerConfigErr> {
  let env = match env::var("ENV") {
    Ok(e) => e,
    Err(_) => ENV_LOCAL.to_string(),
  };

  match env.as_str() {
    ENV_RELEASE => get_configs_release(),
    _ => get_configs_local(),
  }
}

pub fn get_configs_local() -> Result<EnvConfig, ServerConfigErr> {
  let common = get_common_configs()?;
  Ok(EnvConfig {
    bucket: "nan".to_string(),
    release: false,
    ..common
  })
}

pub fn get_configs_release() -> Result<EnvConfig, ServerConfigErr> {
  let common = get_common_configs()?;

  let bucket = match env::var("BUCKET") {
    Ok(v) => v,
    Err(_) => return Err(ServerConfigErr::throw("BUCKET should be provided")),
  };
  if common.infile == DEFAULT_INFILE {
    return Err(ServerConfigErr::throw(
      "INFILE should name an object in BUCKET",
    ));
  }

  Ok(EnvConfig {
    bucket,
    release: true,
    ..common
  })
}

fn get_common_configs() -> Result<EnvConfig, ServerConfigErr> {
  let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
  if port.parse::<u16>().is_err() {
    return Err(ServerConfigErr::throw(&format!(
      "PORT should be a port number, got {}",
      port
    )));
  }

  let num_variants = match env::var("NUM_VARIANTS") {
    Ok(v) => match v.parse() {
      Ok(n) => n,
      Err(e) => {
        return Err(ServerConfigErr::throw(&format!(
          "Invalid NUM_VARIANTS ({}): {}",
          v, e
        )))
      }
    },
    Err(_) => DEFAULT_NUM_VARIANTS,
  };

  Ok(EnvConfig {
    port,
    config_path: env::var("CONFIG").ok().filter(|v| !v.is_empty()),
    infile: env::var("INFILE").unwrap_or_else(|_| DEFAULT_INFILE.to_string()),
    metadata: env::var("METADATA").unwrap_or_default(),
    num_variants,
    username_variant: parse_bool_var("USERNAME_VARIANT", true)?,
    dump_config: parse_bool_var("DUMP_CONFIG", false)?,
    bucket: String::new(),
    release: false,
  })
}

fn parse_bool_var(key: &str, default: bool) -> Result<bool, ServerConfigErr> {
  match env::var(key) {
    Ok(v) => match v.to_lowercase().as_str() {
      "1" | "true" | "yes" => Ok(true),
      "0" | "false" | "no" => Ok(false),
      _ => Err(ServerConfigErr::throw(&format!(
        "{} should be a boolean, got {}",
        key, v
      ))),
    },
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  // the environment is process-wide
  static ENV_LOCK: Mutex<()> = Mutex::new(());

  const VARS: [&str; 10] = [
    "ENV",
    "PORT",
    "CONFIG",
    "INFILE",
    "METADATA",
    "NUM_VARIANTS",
    "USERNAME_VARIANT",
    "DUMP_CONFIG",
    "BUCKET",
    "UNUSED",
  ];

  fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    for key in VARS.iter() {
      env::remove_var(key);
    }
    for (key, value) in vars {
      env::set_var(key, value);
    }
    f();
  }

  #[test]
  fn local_defaults() {
    with_env(&[], || {
      let cfg = get_env_configs().unwrap();
      assert_eq!(cfg.port, "8080");
      assert_eq!(cfg.config_path, None);
      assert_eq!(cfg.infile, "-");
      assert_eq!(cfg.num_variants, 9);
      assert!(cfg.username_variant);
      assert!(!cfg.dump_config);
      assert!(!cfg.release);
    });
  }

  #[test]
  fn local_overrides() {
    with_env(
      &[
        ("PORT", "9000"),
        ("CONFIG", "server.json"),
        ("INFILE", "breach.txt"),
        ("METADATA", "breach-A"),
        ("NUM_VARIANTS", "3"),
        ("USERNAME_VARIANT", "false"),
        ("DUMP_CONFIG", "1"),
      ],
      || {
        let cfg = get_env_configs().unwrap();
        assert_eq!(cfg.port, "9000");
        assert_eq!(cfg.config_path.as_deref(), Some("server.json"));
        assert_eq!(cfg.infile, "breach.txt");
        assert_eq!(cfg.metadata, "breach-A");
        assert_eq!(cfg.num_variants, 3);
        assert!(!cfg.username_variant);
        assert!(cfg.dump_config);
      },
    );
  }

  #[test]
  fn invalid_values_are_rejected() {
    with_env(&[("NUM_VARIANTS", "many")], || {
      assert!(get_env_configs().is_err());
    });
    with_env(&[("USERNAME_VARIANT", "maybe")], || {
      assert!(get_env_configs().is_err());
    });
    with_env(&[("PORT", "http")], || {
      assert!(get_env_configs().is_err());
    });
  }

  #[test]
  fn release_requires_bucket() {
    with_env(&[("ENV", "release"), ("INFILE", "breach.txt")], || {
      assert!(get_env_configs().is_err());
    });
    with_env(
      &[
        ("ENV", "release"),
        ("INFILE", "breach.txt"),
        ("BUCKET", "breaches"),
      ],
      || {
        let cfg = get_env_configs().unwrap();
        assert!(cfg.release);
        assert_eq!(cfg.bucket, "breaches");
      },
    );
  }
}
