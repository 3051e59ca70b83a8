//! Error types.
//!
//! The core cannot fail at runtime once a [`crate::grid::Grid`] exists.
//! Grid allocation is the only fallible construction path.

use thiserror::Error;

/// Failure constructing a [`crate::grid::Grid`].
#[derive(Debug, Error)]
pub enum GridError {
  /// `width` or `height` was zero.
  #[error("grid dimensions must be nonzero, got {width}x{height}")]
  ZeroDimension { width: u32, height: u32 },

  /// The requested cell count overflows the per-cell array allocation.
  #[error("grid of {width}x{height} ({cells} cells) exceeds the allocation limit")]
  TooLarge { width: u32, height: u32, cells: u64 },
}

/// Failure loading or validating a [`crate::config::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse config TOML: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("failed to read config file {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Grid(#[from] GridError),
}
