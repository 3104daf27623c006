//! Frequency quantization
//!
//! A tone whose frequency is an integer multiple of
//! `base_sample_rate / block_size` completes a whole number of cycles in one
//! block, so the waveform repeats seamlessly when blocks are tiled.
//!
//! Requests below one resolution step quantize to 0 Hz and become a constant
//! (DC) term. With the default 1.536 MHz / 8256 configuration the step is about
//! 186 Hz.

use crate::config::SamplingConfig;

/// Snap `frequency` down to the nearest multiple of `resolution_step`
///
/// `resolution_step` must be positive.
pub fn quantize(frequency: f64, resolution_step: f64) -> f64 {
    let quantized = resolution_step * (frequency / resolution_step).floor();
    // the division can round up onto the next multiple
    if quantized > frequency {
        quantized - resolution_step
    } else {
        quantized
    }
}

/// Quantizer bound to one sampling configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyQuantizer {
    resolution_step: f64,
}

impl FrequencyQuantizer {
    pub fn new(sampling: &SamplingConfig) -> Self {
        Self {
            resolution_step: sampling.resolution_step(),
        }
    }

    pub fn resolution_step(&self) -> f64 {
        self.resolution_step
    }

    pub fn quantize(&self, frequency: f64) -> f64 {
        quantize(frequency, self.resolution_step)
    }

    /// Whole cycles a quantized tone completes in one block
    pub fn cycles_per_block(&self, frequency: f64) -> u64 {
        (self.quantize(frequency) / self.resolution_step).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple_is_unchanged() {
        assert_eq!(quantize(300.0, 100.0), 300.0);
        assert_eq!(quantize(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_snaps_down() {
        assert_eq!(quantize(399.9, 100.0), 300.0);
        assert_eq!(quantize(1000.0, 186.0), 930.0);
    }

    #[test]
    fn test_low_frequency_collapses_to_dc() {
        let quantizer = FrequencyQuantizer::new(&SamplingConfig::default());
        assert_eq!(quantizer.quantize(50.0), 0.0);
        assert_eq!(quantizer.quantize(185.0), 0.0);
        assert_eq!(quantizer.cycles_per_block(50.0), 0);
    }

    #[test]
    fn test_default_config_1khz() {
        let quantizer = FrequencyQuantizer::new(&SamplingConfig::default());
        // 1000 / 186.05 = 5.375 -> 5 cycles per block
        assert_eq!(quantizer.cycles_per_block(1000.0), 5);
        let quantized = quantizer.quantize(1000.0);
        assert!((quantized - 5.0 * 1_536_000.0 / 8256.0).abs() < 1e-9);
    }
}
