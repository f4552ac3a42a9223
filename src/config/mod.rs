//! Configuration module for discmeta
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files: network/session behavior, per-source endpoint candidate lists, and
//! the cover cropper engine selection.
//!
//! # Example
//!
//! ```no_run
//! use discmeta::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Configured sources: {}", config.sources.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CropEngine, CropperConfig, NetworkConfig, SourceEntry};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
