//! Headless rasterization of a WAVE file.
//!
//! Writes the polyline one `x y` pair per line, to stdout or a file, so the
//! trace can be plotted by other tools.

use crate::config::WavetraceConfig;
use crate::wave::{FadeVariant, LoadedWave, Polyline};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options for a headless render; `None` falls back to the config file.
#[derive(Debug, Default)]
pub struct RenderOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fade: FadeVariant,
    pub output: Option<PathBuf>,
}

/// Rasterizes `file` and writes the polyline.
///
/// # Errors
/// - If the configuration is invalid
/// - If the file cannot be decoded
/// - If the output cannot be written
pub fn handle_render(file: &Path, options: RenderOptions) -> anyhow::Result<()> {
    tracing::info!("=== wavetrace Render Command ===");

    let config = WavetraceConfig::load()?;
    let width = options.width.unwrap_or(config.render.width);
    let height = options.height.unwrap_or(config.render.height);
    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!(
            "Canvas size must be positive (got {width}x{height})"
        ));
    }

    let wave = LoadedWave::load(file).map_err(|e| anyhow::anyhow!("{}: {e}", file.display()))?;
    let polyline = wave.render(options.fade, width, height);

    tracing::info!(
        "Rendered {} points over {} columns at {}x{} with {} fading",
        polyline.len(),
        polyline.max_x().map_or(0, |x| x + 1),
        width,
        height,
        options.fade.label()
    );

    match options.output {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;
            write_polyline(&polyline, BufWriter::new(file))?;
            tracing::info!("Polyline written to {}", path.display());
        }
        None => write_polyline(&polyline, BufWriter::new(io::stdout().lock()))?,
    }

    Ok(())
}

fn write_polyline<W: Write>(polyline: &Polyline, mut out: W) -> io::Result<()> {
    for point in &polyline.points {
        writeln!(out, "{} {}", point.x, point.y)?;
    }
    out.flush()
}
