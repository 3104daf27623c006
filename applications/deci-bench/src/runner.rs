//! One bench run: synthesize, decimate, write

use crate::config::BenchConfig;
use crate::error::Result;
use crate::output;
use deci_core::{DecimationHarness, Decimator, GeneratedSignal, SignalSynthesizer};
use std::path::PathBuf;
use tracing::info;

/// Synthesized source block, both as floats and as the integer chunk fed to the filter
#[derive(Debug, Clone)]
pub struct SourceBlock {
    pub signal: GeneratedSignal,
    pub chunk: Vec<i32>,
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub decimator: String,
    pub target_sample_rate: u32,
    pub decimation_factor: f64,
    pub chunk_count: usize,
    pub samples_written: usize,
    pub output_path: PathBuf,
}

/// Synthesize one block of the configured tones
pub fn source_block(config: &BenchConfig) -> Result<SourceBlock> {
    config.validate()?;
    let sampling = config.sampling_config()?;

    let synthesizer = SignalSynthesizer::new(sampling)?;
    let signal = synthesizer.synthesize(&config.tone_spec(), sampling.block_size)?;
    let chunk = signal.to_fixed_point(config.signal.fixed_point_scale)?;

    Ok(SourceBlock { signal, chunk })
}

/// Run the harness at `target_sample_rate` through `decimator` and write the WAV file
pub fn run<D>(config: &BenchConfig, target_sample_rate: u32, decimator: &mut D) -> Result<RunSummary>
where
    D: Decimator + ?Sized,
{
    let source = source_block(config)?;
    let decimation = config.decimation_config(target_sample_rate)?;

    info!(
        decimator = decimator.name(),
        base_sample_rate = decimation.sampling.base_sample_rate,
        target_sample_rate,
        factor = decimation.decimation_factor(),
        chunks = decimation.chunk_count,
        "Starting decimation run"
    );

    let buffer = DecimationHarness::new(decimation)?.run(&source.chunk, decimator)?;
    let output_path = output::write_decimated(
        &config.harness.output_dir,
        decimation.sampling.base_sample_rate,
        &buffer,
    )?;

    Ok(RunSummary {
        decimator: decimator.name().to_string(),
        target_sample_rate,
        decimation_factor: decimation.decimation_factor(),
        chunk_count: decimation.chunk_count,
        samples_written: buffer.len(),
        output_path,
    })
}
