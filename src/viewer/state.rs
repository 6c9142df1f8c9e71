//! Viewer state: the loaded waveform, the selected fade, and the last render.

use crate::wave::{AudioMeta, FadeVariant, LoadedWave, Polyline};

/// Polyline from the previous redraw and the inputs that produced it.
#[derive(Debug)]
struct LastRender {
    variant: FadeVariant,
    width: u32,
    height: u32,
    polyline: Polyline,
}

/// Everything the viewer needs between redraws.
///
/// The fade variants are cached inside [`LoadedWave`]; this only tracks
/// which one is shown and keeps the most recent polyline so that redraws
/// with an unchanged size and variant skip rasterization.
#[derive(Debug)]
pub struct ViewerState {
    wave: LoadedWave,
    name: String,
    current: FadeVariant,
    last: Option<LastRender>,
}

impl ViewerState {
    pub fn new(wave: LoadedWave, name: impl Into<String>, initial: FadeVariant) -> Self {
        Self {
            wave,
            name: name.into(),
            current: initial,
            last: None,
        }
    }

    pub fn current_variant(&self) -> FadeVariant {
        self.current
    }

    pub fn meta(&self) -> &AudioMeta {
        &self.wave.meta
    }

    /// Selects the next fade in cycling order and returns it.
    pub fn next_variant(&mut self) -> FadeVariant {
        self.current = self.current.next();
        tracing::debug!("Switched to {} fading", self.current.label());
        self.current
    }

    /// Polyline for the current variant at `width` x `height`.
    ///
    /// Rasterizes only when the size or the variant changed since the last call.
    pub fn render(&mut self, width: u32, height: u32) -> &Polyline {
        let stale = !matches!(
            &self.last,
            Some(last)
                if last.variant == self.current && last.width == width && last.height == height
        );

        if stale {
            tracing::debug!(
                "Rasterizing {} fading at {}x{}",
                self.current.label(),
                width,
                height
            );
            self.last = None;
        }

        let wave = &self.wave;
        let variant = self.current;
        &self
            .last
            .get_or_insert_with(|| LastRender {
                variant,
                width,
                height,
                polyline: wave.render(variant, width, height),
            })
            .polyline
    }

    /// Window-style title, e.g. `speech.wav - linear fading`.
    pub fn title(&self) -> String {
        format!("{} - {} fading", self.name, self.current.label())
    }

    /// Sample count and the unfaded file's max and min, one label per line.
    pub fn info_lines(&self) -> [String; 3] {
        [
            format!("Number of samples: {}", self.wave.meta.num_samples),
            format!("Max value: {}", self.wave.raw_range.max),
            format!("Min value: {}", self.wave.raw_range.min),
        ]
    }
}
