/// Bench error types
use deci_core::DeciError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Decimation error: {0}")]
    Core(#[from] DeciError),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
