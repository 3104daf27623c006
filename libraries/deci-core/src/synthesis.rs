//! Multi-tone test signal synthesis
//!
//! Builds a weighted sum of sines whose frequencies have been quantized to the
//! block resolution, then normalizes it to a peak of exactly 1.0. The result
//! is one block long and tiles without a phase discontinuity.
//!
//! # Example
//!
//! ```rust
//! use deci_core::{synthesize, SamplingConfig, ToneSpec};
//!
//! let sampling = SamplingConfig::default();
//! let tones = ToneSpec::new(vec![1e3, 50e3], vec![1.0, 0.4]);
//! let signal = synthesize(&tones, sampling.block_size, &sampling).unwrap();
//!
//! assert_eq!(signal.len(), 8256);
//! assert!((signal.peak() - 1.0).abs() < 1e-9);
//! ```

use crate::config::SamplingConfig;
use crate::error::{DeciError, Result};
use crate::quantizer::FrequencyQuantizer;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, warn};

/// Requested tone frequencies (Hz) and their weights, paired by index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub frequencies: Vec<f64>,
    pub weights: Vec<f64>,
}

impl ToneSpec {
    pub fn new(frequencies: Vec<f64>, weights: Vec<f64>) -> Self {
        Self {
            frequencies,
            weights,
        }
    }

    /// Check pairing and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.frequencies.len() != self.weights.len() {
            return Err(DeciError::invalid_input(format!(
                "{} frequencies but {} weights; lengths must be identical",
                self.frequencies.len(),
                self.weights.len()
            )));
        }
        if let Some(f) = self
            .frequencies
            .iter()
            .find(|f| !f.is_finite() || **f < 0.0)
        {
            return Err(DeciError::invalid_input(format!(
                "frequency {f} Hz is not a finite non-negative number"
            )));
        }
        if let Some(w) = self.weights.iter().find(|w| !w.is_finite()) {
            return Err(DeciError::invalid_input(format!("weight {w} is not finite")));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// One component of a synthesized signal after quantization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedTone {
    /// Frequency the caller asked for
    pub requested_hz: f64,
    /// Frequency actually synthesized
    pub frequency_hz: f64,
    pub weight: f64,
}

/// A normalized, block-periodic test waveform
///
/// Immutable once synthesized.
#[derive(Debug, Clone)]
pub struct GeneratedSignal {
    index: Vec<usize>,
    samples: Vec<f64>,
    tones: Vec<QuantizedTone>,
    /// `1 / max(|y|)` of the weight-scaled sum
    gain: f64,
    /// Largest `|weight|`; weights are divided by it before summing
    weight_scale: f64,
    base_sample_rate: u32,
}

impl GeneratedSignal {
    /// Sample indices `0..N`
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Normalized samples in `[-1, 1]`
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Quantized components, in the order they were requested
    pub fn tones(&self) -> &[QuantizedTone] {
        &self.tones
    }

    pub fn base_sample_rate(&self) -> u32 {
        self.base_sample_rate
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
    }

    /// Evaluate the normalized waveform at any index, including past the end
    pub fn sample_at(&self, x: usize) -> f64 {
        tone_sum(&self.tones, self.weight_scale, x, self.base_sample_rate) * self.gain
    }

    /// Convert to fixed-point PCM as `trunc(sample * scale)`
    ///
    /// `scale` must lie in `(0, 2^31)`; [`crate::DEFAULT_FIXED_POINT_SCALE`]
    /// leaves 6 dB of headroom.
    pub fn to_fixed_point(&self, scale: f64) -> Result<Vec<i32>> {
        if scale.is_nan() || scale <= 0.0 || scale >= 2_147_483_648.0 {
            return Err(DeciError::invalid_input(format!(
                "fixed-point scale {scale} must be in (0, 2^31)"
            )));
        }
        Ok(self.samples.iter().map(|s| (s * scale) as i32).collect())
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Synthesizer bound to one sampling configuration
#[derive(Debug, Clone)]
pub struct SignalSynthesizer {
    sampling: SamplingConfig,
    quantizer: FrequencyQuantizer,
}

impl SignalSynthesizer {
    pub fn new(sampling: SamplingConfig) -> Result<Self> {
        sampling.validate()?;
        Ok(Self {
            quantizer: FrequencyQuantizer::new(&sampling),
            sampling,
        })
    }

    pub fn quantizer(&self) -> &FrequencyQuantizer {
        &self.quantizer
    }

    /// Synthesize `num_samples` samples of the weighted tone sum
    ///
    /// # Errors
    /// - `InvalidInput` if the tone lists differ in length or hold bad values,
    ///   or if `num_samples` is zero
    /// - `DegenerateSignal` if the sum is zero everywhere
    pub fn synthesize(&self, tone_spec: &ToneSpec, num_samples: usize) -> Result<GeneratedSignal> {
        tone_spec.validate()?;
        if num_samples == 0 {
            return Err(DeciError::invalid_input("number of samples must be positive"));
        }

        let base_sample_rate = self.sampling.base_sample_rate;
        let tones = self.quantize_tones(tone_spec);

        // summing weights relative to the largest one keeps huge weights finite
        let weight_scale = tones.iter().map(|t| t.weight.abs()).fold(0.0, f64::max);
        if weight_scale == 0.0 {
            return Err(DeciError::DegenerateSignal);
        }

        let index: Vec<usize> = (0..num_samples).collect();
        let mut samples: Vec<f64> = index
            .iter()
            .map(|&x| tone_sum(&tones, weight_scale, x, base_sample_rate))
            .collect();

        let peak = samples.iter().map(|s| s.abs()).fold(0.0, f64::max);
        if peak == 0.0 {
            return Err(DeciError::DegenerateSignal);
        }
        if !peak.is_finite() {
            return Err(DeciError::invalid_input(format!(
                "tone sum is not finite (peak {peak})"
            )));
        }

        let gain = 1.0 / peak;
        for sample in &mut samples {
            *sample /= peak;
        }

        debug!(
            tones = tones.len(),
            num_samples,
            peak,
            "Synthesized test signal"
        );

        Ok(GeneratedSignal {
            index,
            samples,
            tones,
            gain,
            weight_scale,
            base_sample_rate,
        })
    }

    fn quantize_tones(&self, tone_spec: &ToneSpec) -> Vec<QuantizedTone> {
        let nyquist = self.sampling.nyquist();

        tone_spec
            .frequencies
            .iter()
            .zip(&tone_spec.weights)
            .map(|(&requested_hz, &weight)| {
                let frequency_hz = self.quantizer.quantize(requested_hz);

                if frequency_hz == 0.0 && requested_hz > 0.0 {
                    warn!(
                        requested_hz,
                        resolution_hz = self.quantizer.resolution_step(),
                        "Tone is below the block resolution and collapses to DC"
                    );
                } else if frequency_hz >= nyquist {
                    warn!(frequency_hz, nyquist, "Tone is at or above Nyquist and will alias");
                }

                debug!(requested_hz, frequency_hz, weight, "Quantized tone");

                QuantizedTone {
                    requested_hz,
                    frequency_hz,
                    weight,
                }
            })
            .collect()
    }
}

/// Synthesize a normalized multi-tone signal for `sampling`
pub fn synthesize(
    tone_spec: &ToneSpec,
    num_samples: usize,
    sampling: &SamplingConfig,
) -> Result<GeneratedSignal> {
    SignalSynthesizer::new(*sampling)?.synthesize(tone_spec, num_samples)
}

fn tone_sum(tones: &[QuantizedTone], weight_scale: f64, x: usize, base_sample_rate: u32) -> f64 {
    let x = x as f64;
    let rate = f64::from(base_sample_rate);
    tones
        .iter()
        .map(|tone| tone.weight / weight_scale * (TAU * x * tone.frequency_hz / rate).sin())
        .sum()
}
