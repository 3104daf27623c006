//! Sampling and decimation configuration
//!
//! Both types are plain values passed explicitly into every component; there is
//! no process-wide configuration state.

use crate::error::{DeciError, Result};
use crate::{DEFAULT_BASE_SAMPLE_RATE, DEFAULT_BLOCK_SIZE};
use serde::{Deserialize, Serialize};

/// Base sample rate and processing block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Rate of the undecimated source stream in Hz
    pub base_sample_rate: u32,

    /// Number of samples in one processing block (one DMA transfer on the device)
    pub block_size: usize,
}

impl SamplingConfig {
    /// Create a validated sampling configuration
    pub fn new(base_sample_rate: u32, block_size: usize) -> Result<Self> {
        let config = Self {
            base_sample_rate,
            block_size,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_sample_rate == 0 {
            return Err(DeciError::configuration("base sample rate must be positive"));
        }
        if self.block_size == 0 {
            return Err(DeciError::configuration("block size must be positive"));
        }
        Ok(())
    }

    /// Frequency spacing whose multiples complete a whole number of cycles per block
    pub fn resolution_step(&self) -> f64 {
        f64::from(self.base_sample_rate) / self.block_size as f64
    }

    /// Nyquist frequency of the base rate
    pub fn nyquist(&self) -> f64 {
        f64::from(self.base_sample_rate) / 2.0
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            base_sample_rate: DEFAULT_BASE_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// Parameters of one chunked decimation run
///
/// All offset arithmetic is done on integers: `block_size / decimation_factor`
/// is exactly `block_size * target / base`, so flooring never depends on how
/// the factor happens to round in floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimationConfig {
    pub sampling: SamplingConfig,

    /// Output rate requested from the filter, in Hz
    pub target_sample_rate: u32,

    /// Number of chunks pushed through the filter
    pub chunk_count: usize,
}

impl DecimationConfig {
    /// Create a validated decimation configuration
    pub fn new(sampling: SamplingConfig, target_sample_rate: u32, chunk_count: usize) -> Result<Self> {
        let config = Self {
            sampling,
            target_sample_rate,
            chunk_count,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.sampling.validate()?;

        if self.target_sample_rate == 0 {
            return Err(DeciError::configuration(format!(
                "decimation factor must be positive (target sample rate is 0, base is {} Hz)",
                self.sampling.base_sample_rate
            )));
        }
        if self.chunk_count == 0 {
            return Err(DeciError::configuration("chunk count must be positive"));
        }
        if self.chunk_output_length() == 0 {
            return Err(DeciError::configuration(format!(
                "a block of {} samples yields no output at decimation factor {}",
                self.sampling.block_size,
                self.decimation_factor()
            )));
        }
        Ok(())
    }

    /// `base_sample_rate / target_sample_rate`, possibly non-integer
    pub fn decimation_factor(&self) -> f64 {
        f64::from(self.sampling.base_sample_rate) / f64::from(self.target_sample_rate)
    }

    /// Samples taken from each chunk's filter output: `floor(block_size / factor)`
    pub fn chunk_output_length(&self) -> usize {
        self.position_floor(1)
    }

    /// Start of chunk `chunk` in the output timeline: `floor(chunk * block_size / factor)`
    ///
    /// # Panics
    /// If the base sample rate is zero; [`DecimationConfig::validate`] rejects that.
    pub fn offset(&self, chunk: usize) -> usize {
        self.position_floor(chunk)
    }

    /// Exact (fractional) start of chunk `chunk` in the output timeline
    pub fn exact_position(&self, chunk: usize) -> f64 {
        chunk as f64 * self.sampling.block_size as f64 / self.decimation_factor()
    }

    /// True when every chunk maps onto a whole number of output samples
    pub fn has_integral_stride(&self) -> bool {
        let scaled = self.sampling.block_size as u128 * u128::from(self.target_sample_rate);
        scaled % u128::from(self.sampling.base_sample_rate) == 0
    }

    /// Length of the assembled buffer: the end of the last chunk's range
    ///
    /// Equals `chunk_count * chunk_output_length` for an integral stride. For a
    /// fractional stride the last offset is pushed past that product, so the
    /// buffer grows to hold the final chunk.
    pub fn buffer_len(&self) -> usize {
        if self.chunk_count == 0 {
            return 0;
        }
        self.offset(self.chunk_count - 1) + self.chunk_output_length()
    }

    /// Offset arithmetic assumes a validated config; a zero base rate panics
    /// here instead of yielding empty offsets.
    fn position_floor(&self, chunk: usize) -> usize {
        let numerator = chunk as u128
            * self.sampling.block_size as u128
            * u128::from(self.target_sample_rate);
        (numerator / u128::from(self.sampling.base_sample_rate)) as usize
    }
}
