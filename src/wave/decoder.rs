//! Canonical PCM WAVE decoding.
//!
//! Reads the fixed 44-byte header sequentially, validates the handful of
//! fields that matter, and decodes every remaining byte of the stream as
//! mono samples. Fields outside the validated set are read and discarded.

use super::error::{WaveError, WaveResult};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Format block size of the basic (non-extended) PCM description.
const CANONICAL_FMT_SIZE: u32 = 16;

/// Audio format code for integer PCM.
const PCM_FORMAT: u16 = 1;

/// Widest sample that still fits in an `i64`.
const MAX_SAMPLE_WIDTH: usize = 8;

/// Upper bound on the buffer reserved from the declared data size.
const MAX_PREALLOC: usize = 64 << 20;

/// Header metadata of a decoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMeta {
    /// Bytes per sample.
    pub sample_width: usize,
    /// Samples declared by the data block (and verified against the stream).
    pub num_samples: usize,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl AudioMeta {
    /// Whether samples are stored unsigned (8-bit PCM).
    pub fn is_unsigned(&self) -> bool {
        self.sample_width == 1
    }

    /// Duration in seconds, or `None` when the header carries no sample rate.
    pub fn duration_secs(&self) -> Option<f64> {
        (self.sample_rate > 0).then(|| self.num_samples as f64 / self.sample_rate as f64)
    }
}

/// Opens and decodes a WAVE file.
///
/// # Errors
/// - If the file cannot be opened or read
/// - If any structural check in [`decode`] fails
pub fn decode_file(path: &Path) -> WaveResult<(Vec<i64>, AudioMeta)> {
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Decodes a canonical mono PCM WAVE stream.
///
/// Checks, in order: container tags, canonical PCM format block, mono
/// channel layout, bit depth, and finally that the stream holds exactly the
/// number of samples the data block declares.
///
/// # Errors
/// Returns the [`WaveError`] naming the first violated expectation.
pub fn decode<R: Read>(mut reader: R) -> WaveResult<(Vec<i64>, AudioMeta)> {
    let chunk_id = read_tag(&mut reader)?;
    // chunk size, unused
    read_tag(&mut reader)?;
    let format = read_tag(&mut reader)?;
    if chunk_id != *b"RIFF" || format != *b"WAVE" {
        return Err(WaveError::NotAContainer);
    }

    read_array::<_, 4>(&mut reader, "format block id")?;

    let fmt_size = read_u32(&mut reader, "format block size")?;
    let audio_format = read_u16(&mut reader, "audio format")?;
    if fmt_size != CANONICAL_FMT_SIZE || audio_format != PCM_FORMAT {
        return Err(WaveError::UnsupportedCompression {
            fmt_size,
            audio_format,
        });
    }

    let channels = read_u16(&mut reader, "channel count")?;
    if channels != 1 {
        return Err(WaveError::UnsupportedChannelLayout { channels });
    }

    let sample_rate = read_u32(&mut reader, "sample rate")?;
    let byte_rate = read_u32(&mut reader, "byte rate")?;
    let block_align = read_u16(&mut reader, "block align")?;
    let bits_per_sample = read_u16(&mut reader, "bits per sample")?;

    let sample_width = usize::from(bits_per_sample / 8);
    if bits_per_sample % 8 != 0 || sample_width == 0 || sample_width > MAX_SAMPLE_WIDTH {
        return Err(WaveError::InvalidSampleWidth { bits_per_sample });
    }

    read_array::<_, 4>(&mut reader, "data block id")?;
    let data_size = read_u32(&mut reader, "data block size")? as usize;
    let num_samples = data_size / sample_width;

    // The declared size is untrusted; let the buffer grow past this.
    let mut data = Vec::with_capacity(data_size.min(MAX_PREALLOC));
    reader.read_to_end(&mut data)?;

    let chunks = data.chunks_exact(sample_width);
    let trailing_bytes = chunks.remainder().len();
    let read = chunks.len();
    if read != num_samples || trailing_bytes != 0 {
        return Err(WaveError::SampleCountMismatch {
            declared: num_samples,
            read,
            trailing_bytes,
        });
    }
    if num_samples == 0 {
        return Err(WaveError::EmptySequence);
    }

    let samples: Vec<i64> = if sample_width == 1 {
        data.iter().map(|&b| i64::from(b)).collect()
    } else {
        data.chunks_exact(sample_width).map(signed_le).collect()
    };

    tracing::debug!(
        "Decoded {} samples ({}-bit, {}Hz)",
        samples.len(),
        bits_per_sample,
        sample_rate
    );

    Ok((
        samples,
        AudioMeta {
            sample_width,
            num_samples,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
        },
    ))
}

/// Interprets 2..=8 little-endian bytes as a sign-extended integer.
fn signed_le(bytes: &[u8]) -> i64 {
    let raw = bytes
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    let unused = 64 - 8 * bytes.len() as u32;
    ((raw << unused) as i64) >> unused
}

/// Reads a four-byte container tag. A stream too short to hold it is not a container.
fn read_tag<R: Read>(reader: &mut R) -> WaveResult<[u8; 4]> {
    read_array(reader, "container tag").map_err(|e| match e {
        WaveError::TruncatedHeader { .. } => WaveError::NotAContainer,
        other => other,
    })
}

fn read_u16<R: Read>(reader: &mut R, field: &'static str) -> WaveResult<u16> {
    read_array(reader, field).map(u16::from_le_bytes)
}

fn read_u32<R: Read>(reader: &mut R, field: &'static str) -> WaveResult<u32> {
    read_array(reader, field).map(u32::from_le_bytes)
}

fn read_array<R: Read, const N: usize>(
    reader: &mut R,
    field: &'static str,
) -> WaveResult<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            WaveError::TruncatedHeader { field }
        } else {
            WaveError::Io(e)
        }
    })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Builds a canonical 44-byte header followed by `data`.
    fn wav_bytes(
        fmt_size: u32,
        audio_format: u16,
        channels: u16,
        bits: u16,
        data_size: u32,
        data: &[u8],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&fmt_size.to_le_bytes());
        out.extend_from_slice(&audio_format.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&(8000 * u32::from(bits / 8)).to_le_bytes());
        out.extend_from_slice(&(bits / 8).to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_size.to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    fn mono(bits: u16, data: &[u8]) -> Vec<u8> {
        wav_bytes(16, 1, 1, bits, data.len() as u32, data)
    }

    fn hound_wav(
        spec: hound::WavSpec,
        write: impl FnOnce(&mut hound::WavWriter<Cursor<&mut Vec<u8>>>),
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        buf
    }

    #[test]
    fn test_decode_hound_16bit_mono() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let input: Vec<i16> = vec![0, 1, -1, i16::MAX, i16::MIN, 1234, -4321];
        let bytes = hound_wav(spec, |w| {
            for &s in &input {
                w.write_sample(s).unwrap();
            }
        });

        let (samples, meta) = decode(Cursor::new(bytes)).unwrap();
        assert_eq!(meta.sample_width, 2);
        assert_eq!(meta.num_samples, input.len());
        assert_eq!(meta.sample_rate, 44100);
        assert_eq!(samples.len(), input.len());
        assert!(samples.iter().all(|s| (-32768..=32767).contains(s)));
        let expected: Vec<i64> = input.iter().map(|&s| i64::from(s)).collect();
        assert_eq!(samples, expected);
    }

    #[test]
    fn test_decode_hound_8bit_is_unsigned() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = hound_wav(spec, |w| {
            for s in [-128i8, 0, 127, -1] {
                w.write_sample(s).unwrap();
            }
        });

        let (samples, meta) = decode(Cursor::new(bytes)).unwrap();
        assert!(meta.is_unsigned());
        assert_eq!(samples, vec![0, 128, 255, 127]);
    }

    #[test]
    fn test_decode_hound_stereo_rejected() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = hound_wav(spec, |w| {
            for s in [1i16, 2, 3, 4] {
                w.write_sample(s).unwrap();
            }
        });

        assert!(matches!(
            decode(Cursor::new(bytes)),
            Err(WaveError::UnsupportedChannelLayout { channels: 2 })
        ));
    }

    #[test]
    fn test_decode_odd_length_8bit() {
        let bytes = mono(8, &[128, 128, 200, 128, 128]);
        let (samples, meta) = decode(Cursor::new(bytes)).unwrap();
        assert_eq!(meta.num_samples, 5);
        assert_eq!(samples, vec![128, 128, 200, 128, 128]);
    }

    #[test]
    fn test_decode_24bit_sign_extension() {
        let data = [0xff, 0xff, 0x7f, 0x00, 0x00, 0x80, 0xff, 0xff, 0xff, 0x01, 0x00, 0x00];
        let (samples, meta) = decode(Cursor::new(mono(24, &data))).unwrap();
        assert_eq!(meta.sample_width, 3);
        assert_eq!(samples, vec![8_388_607, -8_388_608, -1, 1]);
    }

    #[test]
    fn test_decode_32bit_sign_extension() {
        let mut data = Vec::new();
        for v in [i32::MIN, -2, 0, i32::MAX] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let (samples, _) = decode(Cursor::new(mono(32, &data))).unwrap();
        assert_eq!(samples, vec![i64::from(i32::MIN), -2, 0, i64::from(i32::MAX)]);
    }

    #[test]
    fn test_wrong_tags() {
        let mut bytes = mono(8, &[1, 2]);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert!(matches!(decode(Cursor::new(bytes)), Err(WaveError::NotAContainer)));

        let mut bytes = mono(8, &[1, 2]);
        bytes[0..4].copy_from_slice(b"RIFX");
        assert!(matches!(decode(Cursor::new(bytes)), Err(WaveError::NotAContainer)));
    }

    #[test]
    fn test_short_stream_is_not_a_container() {
        assert!(matches!(decode(Cursor::new(b"RIF".to_vec())), Err(WaveError::NotAContainer)));
        assert!(matches!(decode(Cursor::new(Vec::new())), Err(WaveError::NotAContainer)));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = mono(16, &[0, 0]);
        let err = decode(Cursor::new(bytes[..30].to_vec())).unwrap_err();
        assert!(matches!(err, WaveError::TruncatedHeader { field: "byte rate" }));
    }

    #[test]
    fn test_extended_format_block_rejected() {
        let bytes = wav_bytes(18, 1, 1, 16, 2, &[0, 0]);
        assert!(matches!(
            decode(Cursor::new(bytes)),
            Err(WaveError::UnsupportedCompression { fmt_size: 18, audio_format: 1 })
        ));
    }

    #[test]
    fn test_float_format_rejected() {
        let bytes = wav_bytes(16, 3, 1, 32, 4, &[0, 0, 0, 0]);
        assert!(matches!(
            decode(Cursor::new(bytes)),
            Err(WaveError::UnsupportedCompression { audio_format: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_bit_depths() {
        for bits in [0u16, 12, 4, 72] {
            let bytes = wav_bytes(16, 1, 1, bits, 2, &[0, 0]);
            assert!(
                matches!(
                    decode(Cursor::new(bytes)),
                    Err(WaveError::InvalidSampleWidth { bits_per_sample })
                        if bits_per_sample == bits
                ),
                "bit depth {bits} should be rejected"
            );
        }
    }

    #[test]
    fn test_declared_count_exceeds_stream() {
        let bytes = wav_bytes(16, 1, 1, 16, 8, &[1, 0, 2, 0]);
        assert!(matches!(
            decode(Cursor::new(bytes)),
            Err(WaveError::SampleCountMismatch { declared: 4, read: 2, trailing_bytes: 0 })
        ));
    }

    #[test]
    fn test_oversized_declared_length_is_count_mismatch() {
        let bytes = wav_bytes(16, 1, 1, 16, u32::MAX, &[1, 0, 2, 0]);
        match decode(Cursor::new(bytes)) {
            Err(WaveError::SampleCountMismatch {
                declared,
                read,
                trailing_bytes,
            }) => {
                assert_eq!(declared, u32::MAX as usize / 2);
                assert_eq!(read, 2);
                assert_eq!(trailing_bytes, 0);
            }
            other => panic!("expected count mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_64bit_full_scale() {
        let data: Vec<u8> = [i64::MIN, 0, i64::MAX, 0]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let (samples, meta) = decode(Cursor::new(mono(64, &data))).unwrap();
        assert_eq!(meta.sample_width, 8);
        assert_eq!(samples, vec![i64::MIN, 0, i64::MAX, 0]);
    }

    #[test]
    fn test_trailing_chunk_counts_as_samples() {
        let mut bytes = mono(16, &[1, 0, 2, 0]);
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            decode(Cursor::new(bytes)),
            Err(WaveError::SampleCountMismatch { declared: 2, read: 6, .. })
        ));
    }

    #[test]
    fn test_partial_trailing_sample_rejected() {
        // 5 declared bytes at width 2 floor to 2 samples, but a stray byte remains.
        let bytes = wav_bytes(16, 1, 1, 16, 5, &[1, 0, 2, 0, 3]);
        assert!(matches!(
            decode(Cursor::new(bytes)),
            Err(WaveError::SampleCountMismatch { declared: 2, read: 2, trailing_bytes: 1 })
        ));
    }

    #[test]
    fn test_empty_data_block_rejected() {
        let bytes = mono(16, &[]);
        assert!(matches!(decode(Cursor::new(bytes)), Err(WaveError::EmptySequence)));
    }

    #[test]
    fn test_meta_duration() {
        let (_, meta) = decode(Cursor::new(mono(8, &[128; 16]))).unwrap();
        assert_eq!(meta.duration_secs(), Some(16.0 / 8000.0));
    }
}
