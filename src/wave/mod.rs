//! Waveform core: decoding, fading, range analysis and rasterization.
//!
//! [`LoadedWave::load`] does all the expensive work once: it decodes the
//! file and precomputes every fade variant with its value range, so each
//! redraw only has to rasterize.

pub mod decoder;
pub mod error;
pub mod fade;
pub mod range;
pub mod raster;

pub use decoder::{decode, decode_file, AudioMeta};
pub use error::{WaveError, WaveResult};
pub use fade::{apply, FadeVariant};
pub use range::{range_of, ValueRange};
pub use raster::{rasterize, Polyline};

use std::io::Read;
use std::path::Path;

/// One precomputed fade variant.
#[derive(Debug, Clone)]
pub struct FadedSamples {
    pub variant: FadeVariant,
    pub samples: Vec<i64>,
    pub range: ValueRange,
}

/// A decoded file with all fade variants cached for the process lifetime.
#[derive(Debug, Clone)]
pub struct LoadedWave {
    pub meta: AudioMeta,
    /// Range of the unfaded samples, shown as the file's max/min.
    pub raw_range: ValueRange,
    variants: Vec<FadedSamples>,
}

impl LoadedWave {
    /// Decodes `path` and precomputes every fade variant.
    ///
    /// # Errors
    /// Any [`WaveError`] raised while decoding.
    pub fn load(path: &Path) -> WaveResult<Self> {
        tracing::info!("Loading {}", path.display());
        let (samples, meta) = decode_file(path)?;
        Self::from_samples(samples, meta)
    }

    /// Decodes an in-memory or streamed container.
    ///
    /// # Errors
    /// Any [`WaveError`] raised while decoding.
    pub fn from_reader<R: Read>(reader: R) -> WaveResult<Self> {
        let (samples, meta) = decode(reader)?;
        Self::from_samples(samples, meta)
    }

    fn from_samples(samples: Vec<i64>, meta: AudioMeta) -> WaveResult<Self> {
        let raw_range = range_of(&samples)?;

        let variants = FadeVariant::ALL
            .into_iter()
            .map(|variant| -> WaveResult<FadedSamples> {
                let faded = apply(&samples, meta.sample_width, variant);
                let range = range_of(&faded)?;
                tracing::debug!(
                    "Fade {}: max {}, min {}",
                    variant,
                    range.max,
                    range.min
                );
                Ok(FadedSamples {
                    variant,
                    samples: faded,
                    range,
                })
            })
            .collect::<WaveResult<Vec<_>>>()?;

        tracing::info!(
            "Loaded {} samples ({} bytes each), max {}, min {}",
            meta.num_samples,
            meta.sample_width,
            raw_range.max,
            raw_range.min
        );

        Ok(Self {
            meta,
            raw_range,
            variants,
        })
    }

    /// The cached sequence and range for `variant`.
    pub fn variant(&self, variant: FadeVariant) -> &FadedSamples {
        &self.variants[variant.index()]
    }

    /// All cached variants in cycling order.
    pub fn variants(&self) -> &[FadedSamples] {
        &self.variants
    }

    /// Rasterizes the cached `variant` onto a `width` x `height` canvas.
    pub fn render(&self, variant: FadeVariant, width: u32, height: u32) -> Polyline {
        let faded = self.variant(variant);
        rasterize(&faded.samples, faded.range, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn mono_8bit(data: &[u8]) -> Vec<u8> {
        mono_pcm(8, data)
    }

    fn mono_pcm(bits: u16, data: &[u8]) -> Vec<u8> {
        let width = bits / 8;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&(8000 * u32::from(width)).to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_end_to_end_odd_length_8bit() {
        let wave =
            LoadedWave::from_reader(Cursor::new(mono_8bit(&[128, 128, 200, 128, 128]))).unwrap();
        assert_eq!(wave.meta.num_samples, 5);
        assert_eq!(wave.raw_range, ValueRange { max: 200, min: 128 });
        assert_eq!(
            wave.variant(FadeVariant::Linear).samples,
            vec![128, 128, 200, 128, 128]
        );
        assert_eq!(wave.variants().len(), 5);
        for (i, faded) in wave.variants().iter().enumerate() {
            assert_eq!(faded.variant, FadeVariant::ALL[i]);
            assert_eq!(faded.samples.len(), 5);
        }
    }

    #[test]
    fn test_variant_ranges_follow_fades() {
        let wave = LoadedWave::from_reader(Cursor::new(mono_8bit(&[255, 255, 255, 255]))).unwrap();
        assert_eq!(
            wave.variant(FadeVariant::None).range,
            ValueRange { max: 255, min: 255 }
        );
        // the fade pulls the edges back to the midpoint
        assert_eq!(wave.variant(FadeVariant::Quadratic).range.min, 128);
        assert_eq!(wave.variant(FadeVariant::Quadratic).range.max, 255);
    }

    #[test]
    fn test_render_uses_selected_variant() {
        let wave =
            LoadedWave::from_reader(Cursor::new(mono_8bit(&[0, 64, 128, 192, 255, 192]))).unwrap();
        let raw = wave.render(FadeVariant::None, 6, 10);
        let faded = wave.render(FadeVariant::Linear, 6, 10);
        assert_eq!(raw.len(), 6);
        assert_eq!(faded.len(), 6);
        assert_ne!(raw, faded);
    }

    #[test]
    fn test_full_scale_64bit_renders() {
        let data: Vec<u8> = [i64::MIN, 0, i64::MAX, 0]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let wave = LoadedWave::from_reader(Cursor::new(mono_pcm(64, &data))).unwrap();
        assert_eq!(wave.raw_range.span(), u64::MAX);

        let line = wave.render(FadeVariant::None, 4, 10);
        let ys: Vec<u32> = line.points.iter().map(|p| p.y).collect();
        assert_eq!(ys[0], 0);
        assert!(ys[2] >= 9, "{ys:?}");
        assert_eq!(ys[1], ys[3]);
        for variant in FadeVariant::ALL {
            assert_eq!(wave.render(variant, 4, 10).len(), 4);
        }
    }

    #[test]
    fn test_load_from_disk() {
        let path =
            std::env::temp_dir().join(format!("wavetrace-load-{}.wav", std::process::id()));
        std::fs::write(&path, mono_8bit(&[10, 20, 30, 40])).unwrap();
        let wave = LoadedWave::load(&path);
        std::fs::remove_file(&path).unwrap();

        let wave = wave.unwrap();
        assert_eq!(wave.meta.num_samples, 4);
        assert_eq!(wave.raw_range, ValueRange { max: 40, min: 10 });
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("wavetrace-does-not-exist.wav");
        assert!(matches!(LoadedWave::load(&path), Err(WaveError::Io(_))));
    }
}
