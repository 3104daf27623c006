//! Decimation filter test bench
//!
//! Library side of the `deci-bench` binary: layered configuration, the run
//! pipeline (synthesize → decimate chunk by chunk → write WAV) and WAV output.

pub mod config;
pub mod error;
pub mod output;
pub mod runner;

pub use error::{BenchError, Result};
pub use runner::{run, source_block, RunSummary, SourceBlock};
