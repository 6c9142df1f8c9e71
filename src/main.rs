//! wavetrace: terminal waveform viewer for mono PCM WAVE files.

mod app;
mod commands;
mod config;
mod logging;
mod ui;
mod viewer;
mod wave;

use std::process;

fn main() {
    if let Err(e) = app::run() {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
