//! Application command handlers for wavetrace.
//!
//! # Commands
//! - `view`: Interactive waveform viewer (default)
//! - `info`: Header metadata and per-fade value ranges
//! - `render`: Headless rasterization to `x y` pairs
//! - `config`: Open the configuration file in the user's editor
//! - `logs`: Display recent log entries

pub mod config;
pub mod info;
pub mod logs;
pub mod render;
pub mod view;

pub use config::handle_config;
pub use info::handle_info;
pub use logs::handle_logs;
pub use render::{handle_render, RenderOptions};
pub use view::handle_view;
