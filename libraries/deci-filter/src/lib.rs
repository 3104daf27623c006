//! Decimation filter backends
//!
//! Two implementations of [`deci_core::Decimator`]:
//!
//! - [`FirDecimator`]: in-process multi-stage q31 FIR cascade, used as the
//!   reference filter and for runs without the firmware library
//! - [`NativeDecimator`]: the firmware's C filter, compiled as a shared library
//!   and loaded at run time
//!
//! # Example
//!
//! ```rust
//! use deci_core::{synthesize, DecimationConfig, DecimationHarness, SamplingConfig, ToneSpec};
//! use deci_filter::FirDecimator;
//!
//! # fn main() -> deci_core::Result<()> {
//! let sampling = SamplingConfig::default();
//! let tones = ToneSpec::new(vec![1e3], vec![1.0]);
//! let chunk = synthesize(&tones, sampling.block_size, &sampling)?.to_fixed_point(1_073_741_824.0)?;
//!
//! let mut filter = FirDecimator::new(sampling.base_sample_rate);
//! let harness = DecimationHarness::new(DecimationConfig::new(sampling, 48_000, 4)?)?;
//! let decimated = harness.run(&chunk, &mut filter)?;
//! assert_eq!(decimated.len(), 4 * 258);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod cascade;
pub mod fir;
pub mod native;

pub use cascade::FirDecimator;
pub use fir::{design_lowpass, FirStage};
pub use native::NativeDecimator;
