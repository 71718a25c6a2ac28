//! Configuration for the Trail server binary.

use std::{
  num::NonZeroU32,
  path::{Path, PathBuf},
};

use config::{Config, Environment, File, Source};
use serde::Deserialize;
use thiserror::Error;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("rate_limit must be at least 1 request per second")]
  ZeroRate,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TRAIL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  pub store_path: PathBuf,
  /// Shared HS256 secret bearer tokens are signed with.
  pub jwt_secret: String,
  /// Requests admitted per second.
  #[serde(default = "default_rate_limit")]
  pub rate_limit: u32,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_rate_limit() -> u32 { 100 }

impl ServerConfig {
  /// Load from the TOML file at `path` (if present) and the environment.
  /// `rps`, when given, replaces `rate_limit`.
  pub fn load(path: &Path, rps: Option<u32>) -> Result<Self> {
    Self::from_sources(File::from(path).required(false), rps)
  }

  fn from_sources<F>(file: F, rps: Option<u32>) -> Result<Self>
  where
    F: Source + Send + Sync + 'static,
  {
    let settings = Config::builder()
      .add_source(file)
      .add_source(Environment::with_prefix("TRAIL"))
      .set_override_option("rate_limit", rps.map(i64::from))?
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  /// The admission rate, rejecting zero.
  pub fn rate(&self) -> Result<NonZeroU32> {
    NonZeroU32::new(self.rate_limit).ok_or(Error::ZeroRate)
  }

  /// `host:port`
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn parse(toml: &str, rps: Option<u32>) -> Result<ServerConfig> {
    ServerConfig::from_sources(File::from_str(toml, FileFormat::Toml), rps)
  }

  #[test]
  fn defaults_fill_optional_keys() {
    let cfg = parse("store_path = \"trail.db\"\njwt_secret = \"s\"", None).unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.rate_limit, 100);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn file_values_are_read() {
    let cfg = parse(
      "host = \"0.0.0.0\"\nport = 9000\nstore_path = \"x.db\"\njwt_secret = \"s\"\nrate_limit = 5",
      None,
    )
    .unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.rate().unwrap().get(), 5);
  }

  #[test]
  fn rps_flag_overrides_file() {
    let cfg = parse("store_path = \"x.db\"\njwt_secret = \"s\"\nrate_limit = 5", Some(42)).unwrap();
    assert_eq!(cfg.rate_limit, 42);
  }

  #[test]
  fn zero_rate_is_rejected() {
    let cfg = parse("store_path = \"x.db\"\njwt_secret = \"s\"", Some(0)).unwrap();
    assert!(matches!(cfg.rate(), Err(Error::ZeroRate)));
  }

  #[test]
  fn missing_secret_is_an_error() {
    assert!(matches!(parse("store_path = \"x.db\"", None), Err(Error::Config(_))));
  }

  #[test]
  fn tilde_paths_expand() {
    let plain = PathBuf::from("/var/lib/trail.db");
    assert_eq!(expand_tilde(&plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/trail.db")), PathBuf::from(home).join("trail.db"));
    }
  }
}
