//! Symmetric fade envelopes.
//!
//! Each variant fades the first half of a sequence in and the second half
//! out with a weighting curve `w: [0, 1] -> [0, 1]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Midpoint of unsigned 8-bit PCM.
const UNSIGNED_MIDPOINT: i64 = 128;

/// Fade envelope applied to a whole sample sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FadeVariant {
    /// Samples left untouched
    #[default]
    None,
    Linear,
    Quadratic,
    Exponential,
    Logarithmic,
}

impl FadeVariant {
    /// All variants in cycling order.
    pub const ALL: [FadeVariant; 5] = [
        FadeVariant::None,
        FadeVariant::Linear,
        FadeVariant::Quadratic,
        FadeVariant::Exponential,
        FadeVariant::Logarithmic,
    ];

    /// Position of this variant in [`FadeVariant::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::None => 0,
            Self::Linear => 1,
            Self::Quadratic => 2,
            Self::Exponential => 3,
            Self::Logarithmic => 4,
        }
    }

    /// The variant after this one, wrapping back to `None`.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Label used in the viewer title, as in "linear fading".
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "no",
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Exponential => "exponential",
            Self::Logarithmic => "logarithmic",
        }
    }

    /// Weight for position `t` in `[0, 1]`.
    pub fn weight(self, t: f64) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Linear => t,
            Self::Quadratic => t * t,
            Self::Exponential => t.exp2() - 1.0,
            Self::Logarithmic => (t + 1.0).log2(),
        }
    }
}

impl fmt::Display for FadeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Linear => write!(f, "linear"),
            Self::Quadratic => write!(f, "quadratic"),
            Self::Exponential => write!(f, "exponential"),
            Self::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

impl FromStr for FadeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown fade '{s}' (expected none, linear, quadratic, exponential or logarithmic)"
                )
            })
    }
}

/// Applies a fade envelope and returns a new sequence of the same length.
///
/// The envelope ramps `0 -> 1` over the first half and `1 -> 0` over the
/// second. 8-bit samples are recentred around 128 before weighting so the
/// fade always pulls towards silence. Weighted values are floored, not
/// truncated, which matters for negative samples.
///
/// Sequences shorter than two samples have no half-window and come back
/// unchanged.
pub fn apply(samples: &[i64], sample_width: usize, variant: FadeVariant) -> Vec<i64> {
    let n = samples.len();
    let half = n / 2;
    if variant == FadeVariant::None || half == 0 {
        return samples.to_vec();
    }

    let offset = if sample_width == 1 { UNSIGNED_MIDPOINT } else { 0 };
    let half_f = half as f64;

    samples
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let t = if i <= half {
                i as f64 / half_f
            } else {
                (n - i) as f64 / half_f
            };
            let centred = (sample - offset) as f64;
            (centred * variant.weight(t)).floor() as i64 + offset
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let samples = vec![-5, 3, 32767, -32768, 0, 12];
        assert_eq!(apply(&samples, 2, FadeVariant::None), samples);
        let bytes = vec![0, 255, 17];
        assert_eq!(apply(&bytes, 1, FadeVariant::None), bytes);
    }

    #[test]
    fn test_linear_ramp_on_constant_signal() {
        let samples = vec![1000i64; 11];
        let faded = apply(&samples, 2, FadeVariant::Linear);
        assert_eq!(faded.len(), samples.len());
        assert_eq!(faded[0], 0);
        assert_eq!(faded[5], 1000);
        assert_eq!(faded[1], 200);
        assert_eq!(faded[9], 400);
        assert_eq!(faded[10], 200);
        // the tail ramp is shifted one sample right of the head ramp
        assert_eq!(faded[6], 1000);
        assert_eq!(faded[4], faded[7]);
    }

    #[test]
    fn test_floor_rounds_negative_samples_down() {
        let samples = vec![-7i64; 4];
        let faded = apply(&samples, 2, FadeVariant::Linear);
        // t = 0, 0.5, 1, 0.5
        assert_eq!(faded, vec![0, -4, -7, -4]);
    }

    #[test]
    fn test_unsigned_midpoint_is_invariant() {
        let samples = vec![128i64; 9];
        for variant in FadeVariant::ALL {
            assert_eq!(apply(&samples, 1, variant), samples, "{variant}");
        }
    }

    #[test]
    fn test_unsigned_recentres_around_midpoint() {
        let samples = vec![128, 128, 200, 128, 128];
        assert_eq!(apply(&samples, 1, FadeVariant::Linear), samples);

        let samples = vec![200i64, 200, 200, 200, 200];
        // half = 2, t = 0, 0.5, 1, 1, 0.5
        assert_eq!(
            apply(&samples, 1, FadeVariant::Linear),
            vec![128, 164, 200, 200, 164]
        );
        let low = vec![0i64, 0, 0, 0];
        assert_eq!(apply(&low, 1, FadeVariant::Linear), vec![128, 64, 0, 64]);
    }

    #[test]
    fn test_curve_shapes() {
        let samples = vec![1024i64; 5];
        // t = 0.5 at index 1
        assert_eq!(apply(&samples, 2, FadeVariant::Quadratic)[1], 256);
        assert_eq!(
            apply(&samples, 2, FadeVariant::Exponential)[1],
            (1024.0 * (2f64.sqrt() - 1.0)).floor() as i64
        );
        assert_eq!(
            apply(&samples, 2, FadeVariant::Logarithmic)[1],
            (1024.0 * 1.5f64.log2()).floor() as i64
        );
        for variant in FadeVariant::ALL {
            assert_eq!(apply(&samples, 2, variant)[2], 1024, "{variant} peaks at 1");
        }
    }

    #[test]
    fn test_weights_span_unit_interval() {
        for variant in FadeVariant::ALL.into_iter().skip(1) {
            assert_eq!(variant.weight(0.0), 0.0, "{variant}");
            assert!((variant.weight(1.0) - 1.0).abs() < 1e-12, "{variant}");
        }
    }

    #[test]
    fn test_degenerate_lengths_are_identity() {
        assert!(apply(&[], 2, FadeVariant::Linear).is_empty());
        assert_eq!(apply(&[42], 2, FadeVariant::Quadratic), vec![42]);
        assert_eq!(apply(&[7], 1, FadeVariant::Logarithmic), vec![7]);
    }

    #[test]
    fn test_input_untouched() {
        let samples = vec![10i64, 20, 30, 40];
        let copy = samples.clone();
        let _ = apply(&samples, 2, FadeVariant::Exponential);
        assert_eq!(samples, copy);
    }

    #[test]
    fn test_cycle_order() {
        let mut v = FadeVariant::None;
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(v);
            v = v.next();
        }
        assert_eq!(
            seen,
            vec![
                FadeVariant::None,
                FadeVariant::Linear,
                FadeVariant::Quadratic,
                FadeVariant::Exponential,
                FadeVariant::Logarithmic,
                FadeVariant::None,
            ]
        );
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!("Linear".parse::<FadeVariant>(), Ok(FadeVariant::Linear));
        assert_eq!(" none ".parse::<FadeVariant>(), Ok(FadeVariant::None));
        assert!("log".parse::<FadeVariant>().is_err());
        assert_eq!("logarithmic".parse::<FadeVariant>(), Ok(FadeVariant::Logarithmic));
    }
}
