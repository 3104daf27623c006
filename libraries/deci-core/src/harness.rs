//! Chunked decimation harness
//!
//! Pushes a block-sized source chunk through a [`Decimator`] `chunk_count`
//! times and stitches the per-chunk outputs into one target-rate buffer.
//!
//! ```text
//!  chunk 0        chunk 1        chunk 2
//! ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  source  │──►│  source  │──►│  source  │──► Decimator (stateful)
//! └──────────┘   └──────────┘   └──────────┘
//!      │              │              │
//!      ▼              ▼              ▼
//! [offset 0 ..] [offset 1 ..]  [offset 2 ..]  ──► DecimatedBuffer
//! ```
//!
//! Chunk `i` lands at `floor(i * block_size / decimation_factor)`. The offset is
//! recomputed from the exact position every time instead of accumulating a
//! fixed stride, so with a fractional factor every chunk starts less than one
//! sample from where it belongs.
//!
//! If the filter returns fewer samples than `chunk_output_length` for any
//! chunk, the run fails with [`DeciError::TruncatedOutput`] and no buffer is
//! returned.

use crate::config::DecimationConfig;
use crate::decimator::Decimator;
use crate::error::{DeciError, Result};
use tracing::{debug, info};

/// Decimated output assembled from every chunk of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimatedBuffer {
    samples: Vec<i32>,
    sample_rate: u32,
    chunk_output_length: usize,
    chunk_count: usize,
}

impl DecimatedBuffer {
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Target sample rate the buffer was decimated to
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn chunk_output_length(&self) -> usize {
        self.chunk_output_length
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn into_inner(self) -> Vec<i32> {
        self.samples
    }
}

/// Drives a decimator over a sequence of chunks
#[derive(Debug, Clone)]
pub struct DecimationHarness {
    config: DecimationConfig,
}

impl DecimationHarness {
    /// Create a harness for a validated configuration
    pub fn new(config: DecimationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecimationConfig {
        &self.config
    }

    /// Insertion offset of every chunk, in order
    pub fn offsets(&self) -> Vec<usize> {
        (0..self.config.chunk_count)
            .map(|chunk| self.config.offset(chunk))
            .collect()
    }

    /// Resubmit `source_chunk` for every chunk of the run
    ///
    /// This models a periodic test signal: a block-periodic waveform repeated
    /// `chunk_count` times is one continuous tone.
    pub fn run<D>(&self, source_chunk: &[i32], decimator: &mut D) -> Result<DecimatedBuffer>
    where
        D: Decimator + ?Sized,
    {
        self.check_chunk_len(0, source_chunk)?;
        let chunks = std::iter::repeat(source_chunk).take(self.config.chunk_count);
        self.drive(chunks, decimator)
    }

    /// Feed a distinct chunk on each iteration
    ///
    /// Exactly `chunk_count` chunks of `block_size` samples are required; all
    /// of them are checked before the decimator is touched.
    pub fn run_chunks<'a, I, D>(&self, chunks: I, decimator: &mut D) -> Result<DecimatedBuffer>
    where
        I: IntoIterator<Item = &'a [i32]>,
        D: Decimator + ?Sized,
    {
        let chunks: Vec<&[i32]> = chunks.into_iter().collect();
        if chunks.len() != self.config.chunk_count {
            return Err(DeciError::invalid_input(format!(
                "expected {} chunks, got {}",
                self.config.chunk_count,
                chunks.len()
            )));
        }
        for (i, chunk) in chunks.iter().enumerate() {
            self.check_chunk_len(i, chunk)?;
        }
        self.drive(chunks.into_iter(), decimator)
    }

    fn check_chunk_len(&self, chunk: usize, samples: &[i32]) -> Result<()> {
        let block_size = self.config.sampling.block_size;
        if samples.len() != block_size {
            return Err(DeciError::invalid_input(format!(
                "chunk {chunk} has {} samples, block size is {block_size}",
                samples.len()
            )));
        }
        Ok(())
    }

    fn drive<'a, I, D>(&self, chunks: I, decimator: &mut D) -> Result<DecimatedBuffer>
    where
        I: Iterator<Item = &'a [i32]>,
        D: Decimator + ?Sized,
    {
        let config = &self.config;
        let chunk_len = config.chunk_output_length();

        // filter memory must be initialized before the first chunk
        decimator.configure_sample_rate(config.target_sample_rate)?;

        let mut samples = vec![0i32; config.buffer_len()];
        let mut scratch = vec![0i32; config.sampling.block_size.max(chunk_len)];

        for (i, chunk) in chunks.enumerate() {
            let actual = decimator.downsample(chunk, &mut scratch)?;

            if actual > scratch.len() {
                return Err(DeciError::filter(format!(
                    "{} reported {actual} samples for chunk {i} but the buffer holds {}",
                    decimator.name(),
                    scratch.len()
                )));
            }
            if actual < chunk_len {
                return Err(DeciError::TruncatedOutput {
                    chunk: i,
                    expected: chunk_len,
                    actual,
                });
            }

            let offset = config.offset(i);
            samples[offset..offset + chunk_len].copy_from_slice(&scratch[..chunk_len]);

            debug!(chunk = i, offset, actual, "Decimated chunk");
        }

        info!(
            decimator = decimator.name(),
            target_sample_rate = config.target_sample_rate,
            decimation_factor = config.decimation_factor(),
            chunks = config.chunk_count,
            output_samples = samples.len(),
            "Decimation run complete"
        );

        Ok(DecimatedBuffer {
            samples,
            sample_rate: config.target_sample_rate,
            chunk_output_length: chunk_len,
            chunk_count: config.chunk_count,
        })
    }
}

/// Validate `config`, then run the harness with `source_chunk` resubmitted every chunk
pub fn run<D>(
    config: &DecimationConfig,
    source_chunk: &[i32],
    decimator: &mut D,
) -> Result<DecimatedBuffer>
where
    D: Decimator + ?Sized,
{
    DecimationHarness::new(*config)?.run(source_chunk, decimator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingConfig;

    /// Keeps every Nth sample, no filtering
    struct Picker {
        factor: usize,
        configured: bool,
    }

    impl Decimator for Picker {
        fn configure_sample_rate(&mut self, _target_sample_rate: u32) -> Result<()> {
            self.configured = true;
            Ok(())
        }

        fn downsample(&mut self, source: &[i32], dest: &mut [i32]) -> Result<usize> {
            assert!(self.configured);
            let mut n = 0;
            for (out, sample) in dest.iter_mut().zip(source.iter().step_by(self.factor)) {
                *out = *sample;
                n += 1;
            }
            Ok(n)
        }
    }

    #[test]
    fn test_offsets_integer_factor() {
        let sampling = SamplingConfig::new(32_000, 64).unwrap();
        let config = DecimationConfig::new(sampling, 8_000, 4).unwrap();
        let harness = DecimationHarness::new(config).unwrap();
        assert_eq!(harness.offsets(), vec![0, 16, 32, 48]);
    }

    #[test]
    fn test_wrong_chunk_length() {
        let sampling = SamplingConfig::new(32_000, 64).unwrap();
        let config = DecimationConfig::new(sampling, 8_000, 4).unwrap();
        let mut picker = Picker {
            factor: 4,
            configured: false,
        };

        let result = run(&config, &[0; 63], &mut picker);
        assert!(matches!(result, Err(DeciError::InvalidInput(_))));
        assert!(!picker.configured, "decimator touched before validation");
    }

    #[test]
    fn test_run_stitches_chunks() {
        let sampling = SamplingConfig::new(32_000, 8).unwrap();
        let config = DecimationConfig::new(sampling, 8_000, 3).unwrap();
        let chunk: Vec<i32> = (0..8).collect();
        let mut picker = Picker {
            factor: 4,
            configured: false,
        };

        let buffer = run(&config, &chunk, &mut picker).unwrap();
        assert_eq!(buffer.samples(), &[0, 4, 0, 4, 0, 4]);
        assert_eq!(buffer.sample_rate(), 8_000);
        assert_eq!(buffer.chunk_output_length(), 2);
        assert_eq!(buffer.chunk_count(), 3);
    }

    #[test]
    fn test_run_chunks_count_mismatch() {
        let sampling = SamplingConfig::new(32_000, 8).unwrap();
        let config = DecimationConfig::new(sampling, 8_000, 3).unwrap();
        let harness = DecimationHarness::new(config).unwrap();
        let chunk = [0i32; 8];
        let mut picker = Picker {
            factor: 4,
            configured: false,
        };

        let result = harness.run_chunks([&chunk[..], &chunk[..]], &mut picker);
        assert!(matches!(result, Err(DeciError::InvalidInput(_))));
    }
}
