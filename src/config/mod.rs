//! Configuration management for wavetrace.
//!
//! Settings live in a TOML file in the user's config directory. Every value
//! has a default, so the file is optional.

pub mod file;

pub use file::{ensure_config_file, DisplayConfig, WavetraceConfig};
