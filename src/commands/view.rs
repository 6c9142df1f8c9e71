//! Interactive waveform viewer command.
//!
//! Loads a WAVE file, precomputes every fade variant, and opens the viewer.
//! Without a path argument the user is asked for one.

use crate::config::WavetraceConfig;
use crate::ui::ErrorScreen;
use crate::viewer::{ViewerState, WaveformViewer};
use crate::wave::{FadeVariant, LoadedWave};
use cliclack::{intro, outro};
use console::style;
use std::path::{Path, PathBuf};

/// Opens `file` (or a prompted path) in the interactive viewer.
///
/// Decode failures are shown on the error screen before the error is
/// returned, so nothing is rendered from a partially read file.
///
/// # Errors
/// - If the configuration is invalid
/// - If the file cannot be decoded
/// - If the terminal cannot be driven
pub fn handle_view(file: Option<PathBuf>, fade: Option<FadeVariant>) -> anyhow::Result<()> {
    tracing::info!("=== wavetrace Viewer Started ===");

    let config = match WavetraceConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            show_error(
                "Configuration Error",
                &format!("{err}\n\nPlease check your ~/.config/wavetrace/wavetrace.toml file."),
            )?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    let path = match file {
        Some(path) => path,
        None => prompt_for_path()?,
    };

    let wave = match LoadedWave::load(&path) {
        Ok(wave) => wave,
        Err(err) => {
            tracing::error!("Failed to load {}: {err}", path.display());
            show_error(&format!("Cannot open {}", path.display()), &err.to_string())?;
            return Err(anyhow::anyhow!("{}: {err}", path.display()));
        }
    };

    let initial = fade.unwrap_or(config.display.initial_fade);
    let state = ViewerState::new(wave, display_name(&path), initial);
    tracing::info!(
        "Opening viewer: {} samples, starting with {} fading",
        state.meta().num_samples,
        initial.label()
    );

    let mut viewer = WaveformViewer::new(state, config.display)?;
    viewer.run()?;

    tracing::info!("Viewer closed for {}", path.display());
    Ok(())
}

/// Asks for the file to open, rejecting paths that are not files.
fn prompt_for_path() -> anyhow::Result<PathBuf> {
    println!();
    intro(style(" wavetrace ").on_blue().white())?;

    let input: String = cliclack::input("WAVE file to open")
        .placeholder("./recording.wav")
        .validate(|input: &String| {
            if Path::new(input.trim()).is_file() {
                Ok(())
            } else {
                Err("No such file")
            }
        })
        .interact()?;

    outro("Loading...")?;
    Ok(PathBuf::from(input.trim()))
}

/// File name shown in the viewer title.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn show_error(heading: &str, message: &str) -> anyhow::Result<()> {
    let mut error_screen = ErrorScreen::new()?;
    error_screen.show_error(heading, message)?;
    error_screen.cleanup()
}
