//! Single q31 FIR decimation stage
//!
//! Windowed-sinc low-pass followed by keep-one-in-M. The delay line and the
//! decimation phase survive between calls, so splitting the input into chunks
//! never changes the output.

use std::f64::consts::PI;

/// One FIR low-pass + decimate-by-`factor` stage in q31 fixed point
#[derive(Debug, Clone)]
pub struct FirStage {
    factor: usize,
    coeffs: Vec<i32>,
    /// Circular delay line, newest sample at `pos`
    delay: Vec<i32>,
    pos: usize,
    /// Input samples consumed since the last output
    phase: usize,
}

impl FirStage {
    /// Build a stage with `taps` coefficients and a cutoff expressed as a
    /// fraction of the stage's input Nyquist frequency
    pub fn new(factor: usize, taps: usize, cutoff: f64) -> Self {
        let coeffs = design_lowpass(taps, cutoff)
            .into_iter()
            .map(to_q31)
            .collect::<Vec<_>>();

        Self {
            factor,
            delay: vec![0; coeffs.len()],
            coeffs,
            pos: 0,
            phase: 0,
        }
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    pub fn taps(&self) -> usize {
        self.coeffs.len()
    }

    pub fn coefficients(&self) -> &[i32] {
        &self.coeffs
    }

    /// Filter `input` and append one output sample per `factor` inputs
    pub fn process(&mut self, input: &[i32], output: &mut Vec<i32>) {
        let taps = self.coeffs.len();

        for &sample in input {
            self.delay[self.pos] = sample;
            self.phase += 1;

            if self.phase == self.factor {
                self.phase = 0;
                output.push(self.convolve());
            }

            self.pos += 1;
            if self.pos == taps {
                self.pos = 0;
            }
        }
    }

    /// Clear filter memory and phase
    pub fn reset(&mut self) {
        self.delay.fill(0);
        self.pos = 0;
        self.phase = 0;
    }

    fn convolve(&self) -> i32 {
        let taps = self.coeffs.len();
        let mut acc: i64 = 0;
        let mut idx = self.pos;

        for &coeff in &self.coeffs {
            acc += i64::from(coeff) * i64::from(self.delay[idx]);
            idx = if idx == 0 { taps - 1 } else { idx - 1 };
        }

        // q62 -> q31 with rounding
        let rounded = (acc + (1 << 30)) >> 31;
        rounded.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// Hamming-windowed sinc low-pass, normalized to unity gain at DC
///
/// `cutoff` is relative to Nyquist (1.0 = Nyquist).
pub fn design_lowpass(taps: usize, cutoff: f64) -> Vec<f64> {
    let taps = taps.max(1);
    let center = (taps - 1) as f64 / 2.0;

    let mut h: Vec<f64> = (0..taps)
        .map(|n| {
            let t = n as f64 - center;
            let sinc = if t == 0.0 {
                cutoff
            } else {
                (PI * cutoff * t).sin() / (PI * t)
            };
            let window = if taps == 1 {
                1.0
            } else {
                0.54 - 0.46 * (2.0 * PI * n as f64 / (taps - 1) as f64).cos()
            };
            sinc * window
        })
        .collect();

    let sum: f64 = h.iter().sum();
    for c in &mut h {
        *c /= sum;
    }
    h
}

fn to_q31(value: f64) -> i32 {
    (value * 2_147_483_648.0)
        .round()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_has_unity_dc_gain() {
        for (taps, cutoff) in [(15, 0.5), (23, 1.0 / 3.0), (63, 0.45)] {
            let h = design_lowpass(taps, cutoff);
            assert_eq!(h.len(), taps);
            let sum: f64 = h.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
            // linear phase
            for (a, b) in h.iter().zip(h.iter().rev()) {
                assert!((a - b).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_dc_passes_through() {
        let mut stage = FirStage::new(2, 15, 0.5);
        let input = vec![1 << 20; 200];
        let mut output = Vec::new();
        stage.process(&input, &mut output);

        assert_eq!(output.len(), 100);
        // after the delay line fills, DC comes out unchanged (within q31 rounding)
        for &y in &output[10..] {
            assert!((y - (1 << 20)).abs() <= 16, "{y}");
        }
    }

    #[test]
    fn test_output_count_follows_phase_across_calls() {
        let mut stage = FirStage::new(3, 15, 1.0 / 3.0);
        let mut output = Vec::new();
        stage.process(&[1; 4], &mut output);
        assert_eq!(output.len(), 1);
        stage.process(&[1; 4], &mut output);
        assert_eq!(output.len(), 2);
        stage.process(&[1; 1], &mut output);
        assert_eq!(output.len(), 3);
    }

    #[test]
    fn test_split_input_matches_single_call() {
        let input: Vec<i32> = (0..999).map(|i| (i * 7919 % 2001 - 1000) << 16).collect();

        let mut whole = FirStage::new(2, 23, 0.5);
        let mut expected = Vec::new();
        whole.process(&input, &mut expected);

        let mut split = FirStage::new(2, 23, 0.5);
        let mut actual = Vec::new();
        for chunk in input.chunks(37) {
            split.process(chunk, &mut actual);
        }

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_reset_clears_memory() {
        let mut stage = FirStage::new(2, 15, 0.5);
        let mut first = Vec::new();
        stage.process(&[1 << 24; 40], &mut first);

        stage.reset();
        let mut second = Vec::new();
        stage.process(&[1 << 24; 40], &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn test_full_scale_input_saturates_instead_of_wrapping() {
        let mut stage = FirStage::new(2, 63, 0.45);
        let mut output = Vec::new();
        stage.process(&vec![i32::MAX; 256], &mut output);
        assert!(output[40..].iter().all(|&y| y > i32::MAX - 4096));
    }
}
