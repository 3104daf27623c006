//! Error types for synthesis and decimation runs

use thiserror::Error;

/// Result type alias using `DeciError`
pub type Result<T> = std::result::Result<T, DeciError>;

/// Errors raised by the quantizer, synthesizer, harness and filter backends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeciError {
    /// Caller-supplied data is malformed (mismatched tone lists, wrong chunk length, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The synthesized waveform is identically zero and cannot be normalized
    #[error("Degenerate signal: peak amplitude is zero, cannot normalize")]
    DegenerateSignal,

    /// Sample rates, block size or chunk count are unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The filter produced fewer samples for a chunk than the harness needs
    #[error("Filter returned {actual} samples for chunk {chunk}, expected at least {expected}")]
    TruncatedOutput {
        chunk: usize,
        expected: usize,
        actual: usize,
    },

    /// The decimation filter backend failed
    #[error("Filter error: {0}")]
    Filter(String),
}

impl DeciError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a filter backend error
    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter(msg.into())
    }
}
