use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

const DEFAULT_BUCKET_ENTRIES_EXP: u32 = 6;

/// Parameters of the benchmarks, read from the environment.
pub struct BenchFlags {
  pub bucket_id_bit_size: u32,
  pub bucket_entries: usize,
  pub num_variants: usize,
  pub metadata_len: usize,
}

/// Reads `MIGP_BUCKET_ID_BIT_SIZE`, `MIGP_BUCKET_ENTRIES_EXP`,
/// `MIGP_NUM_VARIANTS` and `MIGP_METADATA_LEN`, falling back to defaults for
/// any variable that is unset or unparseable.
pub fn parse_from_env() -> BenchFlags {
  BenchFlags {
    bucket_id_bit_size: env_or("MIGP_BUCKET_ID_BIT_SIZE", 20),
    bucket_entries: parse_exp_to_usize(&env_or_str(
      "MIGP_BUCKET_ENTRIES_EXP",
      "",
    )),
    num_variants: env_or("MIGP_NUM_VARIANTS", 9),
    metadata_len: env_or("MIGP_METADATA_LEN", 16),
  }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
  env::var(key)
    .ok()
    .and_then(|v| v.parse().ok())
    .unwrap_or(default)
}

fn env_or_str(key: &str, default: &str) -> String {
  env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Interprets `v` as a base-2 exponent. Input that does not parse, or whose
/// power overflows `usize`, gives `2^6`.
pub fn parse_exp_to_usize(v: &str) -> usize {
  let default = 1 << DEFAULT_BUCKET_ENTRIES_EXP;
  v.trim()
    .parse::<u32>()
    .ok()
    .and_then(|exp| 2_usize.checked_pow(exp))
    .unwrap_or(default)
}

/// Splits a `username:password` line at the first colon. The password may
/// itself contain colons. Credentials are raw bytes and need not be UTF-8.
/// Returns `None` if the line has no colon.
pub fn parse_credential_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
  let line = line.strip_suffix(b"\n").unwrap_or(line);
  let line = line.strip_suffix(b"\r").unwrap_or(line);
  let colon = line.iter().position(|&b| b == b':')?;
  Some((&line[..colon], &line[colon + 1..]))
}

/// Opens `path` for line-oriented reading; `-` reads standard input.
pub fn open_input(path: &str) -> io::Result<Box<dyn BufRead>> {
  if path == "-" {
    Ok(Box::new(BufReader::new(io::stdin())))
  } else {
    Ok(Box::new(BufReader::new(File::open(path)?)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn credential_lines() {
    assert_eq!(
      parse_credential_line(b"alice:hunter2"),
      Some((&b"alice"[..], &b"hunter2"[..]))
    );
    assert_eq!(
      parse_credential_line(b"bob:a:b\r\n"),
      Some((&b"bob"[..], &b"a:b"[..]))
    );
    assert_eq!(parse_credential_line(b":pw"), Some((&b""[..], &b"pw"[..])));
    assert_eq!(
      parse_credential_line(b"user:"),
      Some((&b"user"[..], &b""[..]))
    );
    assert_eq!(parse_credential_line(b"no colon here"), None);
  }

  #[test]
  fn credential_lines_need_not_be_utf8() {
    assert_eq!(
      parse_credential_line(b"bob:caf\xe9\n"),
      Some((&b"bob"[..], &b"caf\xe9"[..]))
    );
    assert_eq!(
      parse_credential_line(b"\xff\xfe:pw"),
      Some((&b"\xff\xfe"[..], &b"pw"[..]))
    );
  }

  #[test]
  fn exponents() {
    assert_eq!(parse_exp_to_usize("0"), 1);
    assert_eq!(parse_exp_to_usize("10"), 1024);
    assert_eq!(parse_exp_to_usize("x"), 64);
    assert_eq!(parse_exp_to_usize(""), 64);
  }

  #[test]
  fn overflowing_exponents_fall_back() {
    let bits = usize::BITS;
    assert_eq!(
      parse_exp_to_usize(&(bits - 1).to_string()),
      1_usize << (bits - 1)
    );
    assert_eq!(parse_exp_to_usize(&bits.to_string()), 64);
    assert_eq!(parse_exp_to_usize("4294967295"), 64);
  }

  #[test]
  fn missing_input_file_is_an_error() {
    assert!(open_input("/nonexistent/migp/input.txt").is_err());
  }
}
