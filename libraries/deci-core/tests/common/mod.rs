//! Shared helpers for deci-core integration tests

#![allow(dead_code)]

use deci_core::{DeciError, Decimator, Result};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A call made by the harness, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Configure(u32),
    Downsample { source_len: usize, dest_len: usize },
}

/// Test double that records every call and marks its output with the chunk number
///
/// Chunk `i` is written as `output_len` copies of `i + 1`, so gaps in the
/// assembled buffer show up as zeros and overlaps as out-of-order markers.
pub struct RecordingDecimator {
    pub calls: Vec<Call>,
    output_len: usize,
    short_chunk: Option<(usize, usize)>,
    reported_len: Option<usize>,
    fail_configure: bool,
    chunks_seen: usize,
}

impl RecordingDecimator {
    pub fn new(output_len: usize) -> Self {
        Self {
            calls: Vec::new(),
            output_len,
            short_chunk: None,
            reported_len: None,
            fail_configure: false,
            chunks_seen: 0,
        }
    }

    /// Return only `len` samples for chunk `chunk`
    pub fn short_on(mut self, chunk: usize, len: usize) -> Self {
        self.short_chunk = Some((chunk, len));
        self
    }

    /// Report `len` samples regardless of what was written
    pub fn reporting(mut self, len: usize) -> Self {
        self.reported_len = Some(len);
        self
    }

    pub fn failing_configure(mut self) -> Self {
        self.fail_configure = true;
        self
    }

    pub fn configure_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Configure(_)))
            .count()
    }

    pub fn downsample_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Downsample { .. }))
            .count()
    }
}

impl Decimator for RecordingDecimator {
    fn configure_sample_rate(&mut self, target_sample_rate: u32) -> Result<()> {
        self.calls.push(Call::Configure(target_sample_rate));
        if self.fail_configure {
            return Err(DeciError::configuration(format!(
                "unsupported rate {target_sample_rate}"
            )));
        }
        self.chunks_seen = 0;
        Ok(())
    }

    fn downsample(&mut self, source: &[i32], dest: &mut [i32]) -> Result<usize> {
        self.calls.push(Call::Downsample {
            source_len: source.len(),
            dest_len: dest.len(),
        });

        let chunk = self.chunks_seen;
        self.chunks_seen += 1;

        let len = match self.short_chunk {
            Some((short, len)) if short == chunk => len,
            _ => self.output_len,
        };
        let marker = i32::try_from(chunk + 1).unwrap();
        dest[..len].fill(marker);

        Ok(self.reported_len.unwrap_or(len))
    }

    fn name(&self) -> &str {
        "recording"
    }
}
