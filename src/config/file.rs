//! Configuration file management for wavetrace.
//!
//! This module handles loading the application configuration from a TOML file
//! in the user's config directory. Every key is optional; a missing file means
//! built-in defaults.

use crate::wave::FadeVariant;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Embedded default configuration written by `wavetrace config`.
pub const DEFAULT_CONFIG: &str = include_str!("../../environments/wavetrace.toml");

/// Canvas marker used to plot the trace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// 2x4 dots per cell, the finest resolution
    #[default]
    Braille,
    Dot,
    Block,
    HalfBlock,
}

impl MarkerKind {
    /// The ratatui marker for this kind.
    pub fn marker(self) -> Marker {
        match self {
            Self::Braille => Marker::Braille,
            Self::Dot => Marker::Dot,
            Self::Block => Marker::Block,
            Self::HalfBlock => Marker::HalfBlock,
        }
    }

    /// Plot points per terminal cell, as (columns, rows).
    pub fn resolution(self) -> (u32, u32) {
        match self {
            Self::Braille => (2, 4),
            Self::Dot | Self::Block => (1, 1),
            Self::HalfBlock => (1, 2),
        }
    }
}

/// Interactive viewer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Fade variant selected when the viewer opens
    #[serde(default)]
    pub initial_fade: FadeVariant,
    /// Trace color, any ratatui color string
    #[serde(default = "default_line_color")]
    pub line_color: String,
    /// Canvas background color
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub marker: MarkerKind,
}

fn default_line_color() -> String {
    "blue".to_string()
}

fn default_background() -> String {
    "white".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            initial_fade: FadeVariant::default(),
            line_color: default_line_color(),
            background: default_background(),
            marker: MarkerKind::default(),
        }
    }
}

impl DisplayConfig {
    /// Parsed trace color, falling back to the default on a bad value.
    pub fn line_color(&self) -> Color {
        parse_color(&self.line_color, Color::Blue)
    }

    /// Parsed background color, falling back to the default on a bad value.
    pub fn background(&self) -> Color {
        parse_color(&self.background, Color::White)
    }
}

fn parse_color(value: &str, fallback: Color) -> Color {
    value.parse::<Color>().unwrap_or_else(|_| {
        tracing::warn!("Invalid color '{}' in config, using {:?}", value, fallback);
        fallback
    })
}

/// Headless rendering settings. The defaults match the classic 1200x300 window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    300
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WavetraceConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl WavetraceConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// Returns defaults when the file does not exist.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file exists but cannot be read
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(&config_path)?;
        Self::parse(&config_content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    /// - If the TOML is malformed or a value has the wrong type
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))
    }
}

/// Retrieves the path to the config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("wavetrace");
    Ok(config_dir.join("wavetrace.toml"))
}

/// Writes the default configuration if no config file exists yet.
///
/// # Errors
/// - If the config directory cannot be created
/// - If the file cannot be written
pub fn ensure_config_file() -> anyhow::Result<PathBuf> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::info!("Default configuration written to {}", config_path.display());
    }
    Ok(config_path)
}
