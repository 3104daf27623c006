//! Multi-stage FIR decimator
//!
//! Splits the total decimation factor into a chain of q31 FIR stages of 3 and
//! 2. Early stages run at high rates with short filters; the final stage
//! carries the long, sharp filter that defines the output band.
//!
//! | Target  | Factor from 1.536 MHz | Stages                |
//! |---------|-----------------------|-----------------------|
//! | 192 kHz | 8                     | 2 · 2 · 2             |
//! | 96 kHz  | 16                    | 2 · 2 · 2 · 2         |
//! | 48 kHz  | 32                    | 2 · 2 · 2 · 2 · 2     |
//! | 32 kHz  | 48                    | 3 · 2 · 2 · 2 · 2     |
//! | 24 kHz  | 64                    | 2 · 2 · 2 · 2 · 2 · 2 |
//! | 16 kHz  | 96                    | 3 · 2 · 2 · 2 · 2 · 2 |

use crate::fir::FirStage;
use deci_core::{DeciError, Decimator, Result};
use tracing::{debug, info};

/// Taps of every stage except the last
const INTERMEDIATE_TAPS: usize = 23;

/// Taps of the band-defining final stage
const FINAL_TAPS: usize = 63;

/// Final-stage cutoff as a fraction of the output Nyquist frequency
const FINAL_CUTOFF: f64 = 0.9;

/// In-process reference implementation of the decimation filter
///
/// # Example
///
/// ```rust
/// use deci_core::Decimator;
/// use deci_filter::FirDecimator;
///
/// let mut decimator = FirDecimator::new(1_536_000);
/// decimator.configure_sample_rate(48_000).unwrap();
///
/// let source = vec![0i32; 8256];
/// let mut dest = vec![0i32; 8256];
/// let produced = decimator.downsample(&source, &mut dest).unwrap();
/// assert_eq!(produced, 258);
/// ```
#[derive(Debug, Clone)]
pub struct FirDecimator {
    base_sample_rate: u32,
    target_sample_rate: Option<u32>,
    stages: Vec<FirStage>,
    ping: Vec<i32>,
    pong: Vec<i32>,
}

impl FirDecimator {
    pub fn new(base_sample_rate: u32) -> Self {
        Self {
            base_sample_rate,
            target_sample_rate: None,
            stages: Vec::new(),
            ping: Vec::new(),
            pong: Vec::new(),
        }
    }

    pub fn base_sample_rate(&self) -> u32 {
        self.base_sample_rate
    }

    /// Rate set by the last successful `configure_sample_rate`
    pub fn target_sample_rate(&self) -> Option<u32> {
        self.target_sample_rate
    }

    /// Decimation factor of each stage, in processing order
    pub fn stage_factors(&self) -> Vec<usize> {
        self.stages.iter().map(FirStage::factor).collect()
    }

    /// Factor the total decimation into stages of 3 first, then 2
    fn plan_stages(&self, target_sample_rate: u32) -> Result<Vec<usize>> {
        let base = self.base_sample_rate;
        if target_sample_rate == 0 || base == 0 {
            return Err(DeciError::configuration(format!(
                "cannot decimate {base} Hz to {target_sample_rate} Hz"
            )));
        }
        if base % target_sample_rate != 0 {
            return Err(DeciError::configuration(format!(
                "{target_sample_rate} Hz does not divide the base rate {base} Hz"
            )));
        }

        let mut remaining = (base / target_sample_rate) as usize;
        let mut factors = Vec::new();
        for prime in [3, 2] {
            while remaining % prime == 0 {
                factors.push(prime);
                remaining /= prime;
            }
        }
        if remaining != 1 {
            return Err(DeciError::configuration(format!(
                "decimation factor {} has prime factors other than 2 and 3",
                base / target_sample_rate
            )));
        }
        Ok(factors)
    }
}

impl Decimator for FirDecimator {
    fn configure_sample_rate(&mut self, target_sample_rate: u32) -> Result<()> {
        let factors = self.plan_stages(target_sample_rate)?;
        let last = factors.len().saturating_sub(1);

        self.stages = factors
            .iter()
            .enumerate()
            .map(|(i, &factor)| {
                let cutoff = 1.0 / factor as f64;
                if i == last {
                    FirStage::new(factor, FINAL_TAPS, cutoff * FINAL_CUTOFF)
                } else {
                    FirStage::new(factor, INTERMEDIATE_TAPS, cutoff)
                }
            })
            .collect();
        self.target_sample_rate = Some(target_sample_rate);

        info!(
            base_sample_rate = self.base_sample_rate,
            target_sample_rate,
            stages = ?factors,
            "Configured FIR decimator"
        );
        Ok(())
    }

    fn downsample(&mut self, source: &[i32], dest: &mut [i32]) -> Result<usize> {
        if self.target_sample_rate.is_none() {
            return Err(DeciError::filter(
                "FIR decimator used before configure_sample_rate",
            ));
        }

        let mut current = std::mem::take(&mut self.ping);
        let mut next = std::mem::take(&mut self.pong);
        current.clear();
        current.extend_from_slice(source);

        for stage in &mut self.stages {
            next.clear();
            stage.process(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
        }

        let produced = current.len();
        let result = if produced > dest.len() {
            Err(DeciError::filter(format!(
                "{produced} decimated samples do not fit a {} sample buffer",
                dest.len()
            )))
        } else {
            dest[..produced].copy_from_slice(&current);
            debug!(input = source.len(), produced, "FIR decimator chunk");
            Ok(produced)
        };

        self.ping = current;
        self.pong = next;
        result
    }

    fn name(&self) -> &str {
        "fir-cascade"
    }
}
