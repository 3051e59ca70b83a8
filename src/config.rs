//! TOML-loadable simulation configuration.
//!
//! World and material settings load from TOML via `serde`; this crate has
//! no asset server, so it parses TOML directly with `toml::from_str`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Knobs a real embedder sets once at startup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
  pub width: u32,
  pub height: u32,
  pub tick_hz: f32,
  pub seed: u32,
}

impl Default for SimConfig {
  fn default() -> Self {
    Self {
      width: 256,
      height: 256,
      tick_hz: 120.0,
      seed: 1,
    }
  }
}

impl SimConfig {
  pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(src)?)
  }

  pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.display().to_string(),
      source,
    })?;
    Self::from_toml_str(&text)
  }
}
