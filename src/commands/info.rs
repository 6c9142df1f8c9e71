//! Print header metadata and value ranges of a WAVE file.

use crate::wave::LoadedWave;
use std::path::Path;

/// Decodes `file` and prints its metadata and the range of every fade variant.
///
/// # Errors
/// - If the file cannot be decoded
pub fn handle_info(file: &Path) -> anyhow::Result<()> {
    tracing::info!("=== wavetrace Info Command ===");

    let wave = LoadedWave::load(file).map_err(|e| anyhow::anyhow!("{}: {e}", file.display()))?;
    println!("{}", format_info(file, &wave));
    Ok(())
}

fn format_info(file: &Path, wave: &LoadedWave) -> String {
    let meta = &wave.meta;
    let signedness = if meta.is_unsigned() { "unsigned" } else { "signed" };
    let duration = meta
        .duration_secs()
        .map(|secs| format!("{secs:.3}s"))
        .unwrap_or_else(|| "unknown".to_string());

    let mut out = vec![
        format!("File:              {}", file.display()),
        format!(
            "Sample width:      {} bytes ({}-bit {signedness})",
            meta.sample_width, meta.bits_per_sample
        ),
        format!("Sample rate:       {} Hz", meta.sample_rate),
        format!("Byte rate:         {}", meta.byte_rate),
        format!("Block align:       {}", meta.block_align),
        format!("Duration:          {duration}"),
        format!("Number of samples: {}", meta.num_samples),
        format!("Max value:         {}", wave.raw_range.max),
        format!("Min value:         {}", wave.raw_range.min),
        String::new(),
        format!("{:<12} {:>12} {:>12}", "fade", "max", "min"),
    ];

    for faded in wave.variants() {
        out.push(format!(
            "{:<12} {:>12} {:>12}",
            faded.variant.to_string(),
            faded.range.max,
            faded.range.min
        ));
    }

    out.join("\n")
}
