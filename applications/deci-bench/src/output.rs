//! WAV output
//!
//! Everything is written as mono 32-bit signed integer PCM, the same sample
//! format the filter consumes and produces.

use crate::error::Result;
use deci_core::DecimatedBuffer;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the base-rate source block written by `tones`
pub const SOURCE_BLOCK_FILE: &str = "source_block.wav";

/// `{target_khz}kHz_{factor}_to_1_decimation.wav`, factor truncated to an integer
pub fn decimated_file_name(base_sample_rate: u32, target_sample_rate: u32) -> String {
    let factor = f64::from(base_sample_rate) / f64::from(target_sample_rate);
    format!(
        "{}kHz_{}_to_1_decimation.wav",
        target_sample_rate / 1000,
        factor.trunc() as u64
    )
}

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Int,
    }
}

/// Write `samples` to `path`, creating parent directories as needed
pub fn write_wav(path: &Path, samples: &[i32], sample_rate: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WavWriter::create(path, wav_spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!(
        path = %path.display(),
        samples = samples.len(),
        sample_rate,
        "Wrote WAV file"
    );
    Ok(())
}

/// Write a harness result into `dir` under its conventional name
pub fn write_decimated(
    dir: &Path,
    base_sample_rate: u32,
    buffer: &DecimatedBuffer,
) -> Result<PathBuf> {
    let path = dir.join(decimated_file_name(base_sample_rate, buffer.sample_rate()));
    write_wav(&path, buffer.samples(), buffer.sample_rate())?;
    Ok(path)
}

/// Write one source block at the base rate into `dir`
pub fn write_source_block(dir: &Path, block: &[i32], base_sample_rate: u32) -> Result<PathBuf> {
    let path = dir.join(SOURCE_BLOCK_FILE);
    write_wav(&path, block, base_sample_rate)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_for_supported_rates() {
        let base = 1_536_000;
        assert_eq!(decimated_file_name(base, 192_000), "192kHz_8_to_1_decimation.wav");
        assert_eq!(decimated_file_name(base, 48_000), "48kHz_32_to_1_decimation.wav");
        assert_eq!(decimated_file_name(base, 32_000), "32kHz_48_to_1_decimation.wav");
        assert_eq!(decimated_file_name(base, 16_000), "16kHz_96_to_1_decimation.wav");
    }

    #[test]
    fn test_fractional_factor_is_truncated() {
        assert_eq!(decimated_file_name(36_000, 8_000), "8kHz_4_to_1_decimation.wav");
    }
}
