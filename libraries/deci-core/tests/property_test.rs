//! Property-based tests for quantization and offset bookkeeping
//!
//! These tests use proptest to verify invariants across many random inputs.

use deci_core::{quantize, DecimationConfig, SamplingConfig};
use proptest::prelude::*;

proptest! {
    /// Property: quantized frequencies are multiples of the step and never exceed the request
    #[test]
    fn quantized_frequency_is_a_lower_multiple(
        frequency in 0.0f64..1_000_000.0,
        step in 0.01f64..5_000.0,
    ) {
        let quantized = quantize(frequency, step);
        let multiple = quantized / step;

        prop_assert!(quantized <= frequency, "{} > {}", quantized, frequency);
        prop_assert!(quantized >= 0.0);
        prop_assert!(
            (multiple - multiple.round()).abs() < 1e-6,
            "{} is not a multiple of {}", quantized, step
        );
        // never more than one step below the request
        prop_assert!(frequency - quantized < step * (1.0 + 1e-9));
    }

    /// Property: anything below half a step collapses to DC
    #[test]
    fn low_frequencies_collapse_to_zero(
        step in 0.01f64..5_000.0,
        fraction in 0.0f64..0.5,
    ) {
        prop_assert_eq!(quantize(step * fraction, step), 0.0);
    }

    /// Property: every chunk starts less than one sample before its exact position
    #[test]
    fn offsets_track_exact_position(
        base in 8_000u32..2_000_000,
        block_size in 64usize..16_384,
        divisor in 1.0f64..64.0,
        chunk in 0usize..1_000,
    ) {
        let target = ((f64::from(base) / divisor) as u32).max(1);
        let sampling = SamplingConfig::new(base, block_size).unwrap();
        let config = DecimationConfig {
            sampling,
            target_sample_rate: target,
            chunk_count: chunk + 1,
        };
        prop_assume!(config.validate().is_ok());

        let offset = config.offset(chunk);
        let drift = config.exact_position(chunk) - offset as f64;
        prop_assert!(drift > -1e-6 && drift < 1.0, "drift {}", drift);
    }

    /// Property: consecutive chunks never overlap and never leave more than one sample between them
    #[test]
    fn consecutive_offsets_step_by_chunk_length(
        base in 8_000u32..2_000_000,
        target_ratio in 0.01f64..1.0,
        block_size in 64usize..16_384,
        chunk_count in 2usize..200,
    ) {
        let target = ((f64::from(base) * target_ratio) as u32).max(1);
        let sampling = SamplingConfig::new(base, block_size).unwrap();
        let config = DecimationConfig {
            sampling,
            target_sample_rate: target,
            chunk_count,
        };
        prop_assume!(config.validate().is_ok());

        let chunk_len = config.chunk_output_length();
        for i in 1..chunk_count {
            let step = config.offset(i) - config.offset(i - 1);
            prop_assert!(step == chunk_len || step == chunk_len + 1);
        }
        prop_assert!(config.buffer_len() >= config.offset(chunk_count - 1) + chunk_len);
    }
}
