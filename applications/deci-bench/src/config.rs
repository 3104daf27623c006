/// Bench configuration
use crate::error::{BenchError, Result};
use deci_core::{
    DecimationConfig, SamplingConfig, ToneSpec, DEFAULT_BASE_SAMPLE_RATE, DEFAULT_BLOCK_SIZE,
    DEFAULT_CHUNK_COUNT, DEFAULT_FIXED_POINT_SCALE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "deci-bench.toml";

/// Environment variable prefix, e.g. `DECI_HARNESS__CHUNK_COUNT=10`
pub const ENV_PREFIX: &str = "DECI";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BenchConfig {
    #[serde(default = "default_sampling")]
    pub sampling: SamplingSettings,

    #[serde(default = "default_signal")]
    pub signal: SignalSettings,

    #[serde(default = "default_harness")]
    pub harness: HarnessSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SamplingSettings {
    #[serde(default = "default_base_sample_rate")]
    pub base_sample_rate: u32,

    #[serde(default = "default_block_size")]
    pub block_size: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SignalSettings {
    #[serde(default = "default_frequencies")]
    pub frequencies: Vec<f64>,

    #[serde(default = "default_weights")]
    pub weights: Vec<f64>,

    /// Multiplier from the normalized waveform to `i32` samples
    #[serde(default = "default_fixed_point_scale")]
    pub fixed_point_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HarnessSettings {
    #[serde(default = "default_chunk_count")]
    pub chunk_count: usize,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sampling: default_sampling(),
            signal: default_signal(),
            harness: default_harness(),
        }
    }
}

impl BenchConfig {
    /// Load configuration from defaults, a TOML file and the environment
    ///
    /// `path` must exist when given; otherwise `deci-bench.toml` in the working
    /// directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`BenchConfig::load`], reading overrides from `env` instead of the
    /// process environment when it is `Some`
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(BenchError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (DECI_SECTION__KEY)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings
            .build()
            .map_err(|e| BenchError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| BenchError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.sampling_config()?;

        if self.harness.chunk_count == 0 {
            return Err(BenchError::Config(
                "harness.chunk_count must be at least 1".to_string(),
            ));
        }

        let scale = self.signal.fixed_point_scale;
        if scale.is_nan() || scale <= 0.0 || scale >= 2_147_483_648.0 {
            return Err(BenchError::Config(format!(
                "signal.fixed_point_scale {scale} must lie in (0, 2^31)"
            )));
        }

        self.tone_spec().validate()?;
        Ok(())
    }

    pub fn sampling_config(&self) -> Result<SamplingConfig> {
        Ok(SamplingConfig::new(
            self.sampling.base_sample_rate,
            self.sampling.block_size,
        )?)
    }

    pub fn tone_spec(&self) -> ToneSpec {
        ToneSpec::new(self.signal.frequencies.clone(), self.signal.weights.clone())
    }

    /// Harness configuration for one run at `target_sample_rate`
    pub fn decimation_config(&self, target_sample_rate: u32) -> Result<DecimationConfig> {
        Ok(DecimationConfig::new(
            self.sampling_config()?,
            target_sample_rate,
            self.harness.chunk_count,
        )?)
    }
}

// Default values
fn default_sampling() -> SamplingSettings {
    SamplingSettings {
        base_sample_rate: default_base_sample_rate(),
        block_size: default_block_size(),
    }
}

fn default_base_sample_rate() -> u32 {
    DEFAULT_BASE_SAMPLE_RATE
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

fn default_signal() -> SignalSettings {
    SignalSettings {
        frequencies: default_frequencies(),
        weights: default_weights(),
        fixed_point_scale: default_fixed_point_scale(),
    }
}

fn default_frequencies() -> Vec<f64> {
    vec![1e3, 50e3, 120e3, 170e3]
}

fn default_weights() -> Vec<f64> {
    vec![1.0, 0.4, 0.3, 0.2]
}

fn default_fixed_point_scale() -> f64 {
    DEFAULT_FIXED_POINT_SCALE
}

fn default_harness() -> HarnessSettings {
    HarnessSettings {
        chunk_count: default_chunk_count(),
        output_dir: default_output_dir(),
    }
}

fn default_chunk_count() -> usize {
    DEFAULT_CHUNK_COUNT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./out")
}
