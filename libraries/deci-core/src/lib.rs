//! Decimation test bench core
//!
//! This crate provides:
//! - Frequency quantization to the block resolution `base_sample_rate / block_size`
//! - Synthesis of normalized multi-tone signals that tile seamlessly across blocks
//! - A harness that drives a stateful [`Decimator`] chunk by chunk and stitches
//!   the outputs into one continuous target-rate buffer
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐     ┌──────────────┐     ┌────────────────┐
//! │ ToneSpec  │ ──► │ Synthesizer  │ ──► │ GeneratedSignal│
//! └───────────┘     └──────────────┘     └────────────────┘
//!                          │                     │ to_fixed_point
//!                          ▼                     ▼
//!                   ┌──────────────┐     ┌────────────────┐     ┌────────────────┐
//!                   │  Quantizer   │     │    Harness     │ ──► │DecimatedBuffer │
//!                   └──────────────┘     └────────────────┘     └────────────────┘
//!                                                │ ▲
//!                                                ▼ │
//!                                        ┌────────────────┐
//!                                        │   Decimator    │
//!                                        └────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use deci_core::{
//!     synthesize, DecimationConfig, DecimationHarness, Decimator, Result, SamplingConfig,
//!     ToneSpec, DEFAULT_FIXED_POINT_SCALE,
//! };
//!
//! // keeps every 32nd sample
//! struct Pick32;
//!
//! impl Decimator for Pick32 {
//!     fn configure_sample_rate(&mut self, _target: u32) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn downsample(&mut self, source: &[i32], dest: &mut [i32]) -> Result<usize> {
//!         let mut n = 0;
//!         for (out, s) in dest.iter_mut().zip(source.iter().step_by(32)) {
//!             *out = *s;
//!             n += 1;
//!         }
//!         Ok(n)
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let sampling = SamplingConfig::default();
//! let tones = ToneSpec::new(vec![1e3, 50e3], vec![1.0, 0.4]);
//! let signal = synthesize(&tones, sampling.block_size, &sampling)?;
//! let chunk = signal.to_fixed_point(DEFAULT_FIXED_POINT_SCALE)?;
//!
//! let config = DecimationConfig::new(sampling, 48_000, 10)?;
//! let buffer = DecimationHarness::new(config)?.run(&chunk, &mut Pick32)?;
//! assert_eq!(buffer.len(), 10 * 258);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod config;
mod decimator;
mod error;
mod harness;
mod quantizer;
mod synthesis;

pub use config::{DecimationConfig, SamplingConfig};
pub use decimator::Decimator;
pub use error::{DeciError, Result};
pub use harness::{run, DecimatedBuffer, DecimationHarness};
pub use quantizer::{quantize, FrequencyQuantizer};
pub use synthesis::{synthesize, GeneratedSignal, QuantizedTone, SignalSynthesizer, ToneSpec};

/// Base sample rate of the source stream (Hz)
pub const DEFAULT_BASE_SAMPLE_RATE: u32 = 1_536_000;

/// Samples per processing block (one DMA transfer)
pub const DEFAULT_BLOCK_SIZE: usize = 8256;

/// Number of chunks pushed through the filter per run
pub const DEFAULT_CHUNK_COUNT: usize = 100;

/// 2^30: fills part of the `i32` range without going full scale
pub const DEFAULT_FIXED_POINT_SCALE: f64 = 1_073_741_824.0;
