//! Error taxonomy for decoding and analysing waveforms.
//!
//! Every variant is fatal for the file being loaded: the decoder never hands
//! back a partially decoded sequence.

/// Convenience result type used across the waveform core.
pub type WaveResult<T> = Result<T, WaveError>;

/// Errors raised while decoding a container or analysing its samples.
#[derive(thiserror::Error, Debug)]
pub enum WaveError {
    /// The RIFF/WAVE tags are missing or wrong.
    #[error("not a WAVE file: expected RIFF/WAVE container tags")]
    NotAContainer,

    /// The format block is not the canonical 16-byte integer PCM layout.
    #[error(
        "file must be uncompressed PCM (format block size {fmt_size}, audio format {audio_format}; expected 16 and 1)"
    )]
    UnsupportedCompression { fmt_size: u32, audio_format: u16 },

    /// More than one channel, or none.
    #[error("file must be mono (found {channels} channels)")]
    UnsupportedChannelLayout { channels: u16 },

    /// Bits per sample that do not describe a whole number of bytes we can hold.
    #[error("unsupported bit depth {bits_per_sample} (expected a non-zero multiple of 8, at most 64)")]
    InvalidSampleWidth { bits_per_sample: u16 },

    /// The stream ended inside the header.
    #[error("WAVE header truncated while reading {field}")]
    TruncatedHeader { field: &'static str },

    /// Declared and actually stored sample counts differ.
    #[error(
        "file has an incorrect number of samples: header declares {declared}, stream holds {read} (plus {trailing_bytes} stray bytes)"
    )]
    SampleCountMismatch {
        declared: usize,
        read: usize,
        trailing_bytes: usize,
    },

    /// A range was requested over zero samples.
    #[error("sample sequence is empty")]
    EmptySequence,

    /// Underlying read failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
