//! Decimation filter interface
//!
//! The harness only ever talks to a filter through this trait, whether it is a
//! native library loaded at run time, the in-process reference cascade, or a
//! test double.

use crate::error::Result;

/// A stateful integer decimation filter
///
/// Implementations keep filter memory and decimation phase between calls to
/// [`Decimator::downsample`], so consecutive chunks are filtered as one
/// continuous stream.
pub trait Decimator {
    /// Reset internal state and prepare to decimate to `target_sample_rate` Hz
    ///
    /// Must be called once before the first `downsample` of a run.
    fn configure_sample_rate(&mut self, target_sample_rate: u32) -> Result<()>;

    /// Filter and decimate one chunk
    ///
    /// # Arguments
    /// - `source`: samples at the base rate
    /// - `dest`: scratch buffer for the decimated samples
    ///
    /// # Returns
    /// Number of valid samples written to the front of `dest`. This may be
    /// smaller than the caller expects.
    fn downsample(&mut self, source: &[i32], dest: &mut [i32]) -> Result<usize>;

    /// Short human-readable backend name for logging
    fn name(&self) -> &str {
        "decimator"
    }
}

impl<D: Decimator + ?Sized> Decimator for Box<D> {
    fn configure_sample_rate(&mut self, target_sample_rate: u32) -> Result<()> {
        (**self).configure_sample_rate(target_sample_rate)
    }

    fn downsample(&mut self, source: &[i32], dest: &mut [i32]) -> Result<usize> {
        (**self).downsample(source, dest)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
