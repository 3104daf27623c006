/// deci-bench - decimation filter test bench
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use deci_bench::{config::BenchConfig, output, runner, RunSummary};
use deci_filter::{FirDecimator, NativeDecimator};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "deci-bench")]
#[command(about = "Feed synthesized tones through a decimation filter and write the result as WAV", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./deci-bench.toml when present)
    #[arg(short, long, global = true, env = "DECI_BENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Number of chunks to push through the filter
    #[arg(long, global = true)]
    chunks: Option<usize>,

    /// Directory for WAV output
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the compiled C filter library
    Native {
        /// Path to the shared library exporting the decimation_filter_* functions
        clib: PathBuf,
        /// Target sample rate in kHz
        #[arg(value_enum)]
        sample_rate: TargetRate,
    },
    /// Run the built-in FIR cascade
    Builtin {
        /// Target sample rate in kHz
        #[arg(value_enum)]
        sample_rate: TargetRate,
    },
    /// Print the quantized test tones and write one source block
    Tones,
}

/// Output rates the recorder supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetRate {
    #[value(name = "16")]
    Khz16,
    #[value(name = "24")]
    Khz24,
    #[value(name = "32")]
    Khz32,
    #[value(name = "48")]
    Khz48,
    #[value(name = "96")]
    Khz96,
    #[value(name = "192")]
    Khz192,
}

impl TargetRate {
    fn hz(self) -> u32 {
        match self {
            TargetRate::Khz16 => 16_000,
            TargetRate::Khz24 => 24_000,
            TargetRate::Khz32 => 32_000,
            TargetRate::Khz48 => 48_000,
            TargetRate::Khz96 => 96_000,
            TargetRate::Khz192 => 192_000,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deci_bench=info,deci_core=info,deci_filter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Native { clib, sample_rate } => {
            let mut decimator = NativeDecimator::open(&clib)
                .with_context(|| format!("Failed to load filter library {}", clib.display()))?;
            let summary = runner::run(&config, sample_rate.hz(), &mut decimator)
                .context("Native decimation run failed")?;
            report(&summary);
        }
        Commands::Builtin { sample_rate } => {
            let mut decimator = FirDecimator::new(config.sampling.base_sample_rate);
            let summary = runner::run(&config, sample_rate.hz(), &mut decimator)
                .context("Built-in decimation run failed")?;
            report(&summary);
        }
        Commands::Tones => {
            tones(&config)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<BenchConfig> {
    let mut config =
        BenchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(chunks) = cli.chunks {
        config.harness.chunk_count = chunks;
    }
    if let Some(dir) = &cli.output_dir {
        config.harness.output_dir = dir.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn report(summary: &RunSummary) {
    tracing::info!(
        decimator = %summary.decimator,
        target_sample_rate = summary.target_sample_rate,
        factor = summary.decimation_factor,
        chunks = summary.chunk_count,
        samples = summary.samples_written,
        "Bench run finished"
    );
    println!("{}", summary.output_path.display());
}

fn tones(config: &BenchConfig) -> anyhow::Result<()> {
    let source = runner::source_block(config).context("Failed to synthesize test signal")?;
    let step = config.sampling_config()?.resolution_step();

    println!("Resolution step: {step:.3} Hz");
    println!("{:>14}  {:>14}  {:>8}  {:>6}", "requested Hz", "quantized Hz", "cycles", "weight");
    for tone in source.signal.tones() {
        println!(
            "{:>14.3}  {:>14.3}  {:>8}  {:>6.3}",
            tone.requested_hz,
            tone.frequency_hz,
            (tone.frequency_hz / step).round(),
            tone.weight
        );
    }

    let path = output::write_source_block(
        &config.harness.output_dir,
        &source.chunk,
        config.sampling.base_sample_rate,
    )
    .context("Failed to write source block")?;
    println!("{}", path.display());

    Ok(())
}
