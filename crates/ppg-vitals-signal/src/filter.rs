//! Zero-phase Butterworth filtering for PPG waveforms.
//!
//! The pulse band of interest is 0.5-8 Hz (30-480 BPM plus harmonics).
//! The bandpass is realized as a cascade of second-order Butterworth
//! biquad sections applied forward and backward, so the filter
//! contributes no group delay. Downstream peak timing depends on this:
//! a causal IIR filter would shift pulse peaks by a frequency-dependent
//! amount and bias HR/HRV estimates.

use ppg_vitals_core::error::SignalError;
use std::f64::consts::PI;
use tracing::warn;

/// Minimum input length accepted by the filter stage.
pub const MIN_FILTER_INPUT: usize = 10;

/// Clamp range for cutoffs normalized by Nyquist. Matches the canonical
/// preprocessing bounds; see DESIGN.md for the rejected alternative.
const NORM_FREQ_MIN: f64 = 0.01;
const NORM_FREQ_MAX: f64 = 0.99;

/// Pole quality factors of a 4th-order Butterworth filter,
/// `1/(2*cos(pi/8))` and `1/(2*cos(3*pi/8))`.
const BUTTERWORTH_Q4: [f64; 2] = [0.541_196_100_146_197, 1.306_562_964_876_377];

/// Bandpass cutoff specification.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    /// Low cutoff in Hz.
    pub low_cut_hz: f64,
    /// High cutoff in Hz.
    pub high_cut_hz: f64,
    /// Filter order. Only 4 is supported.
    pub order: usize,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            low_cut_hz: 0.5,
            high_cut_hz: 8.0,
            order: 4,
        }
    }
}

/// One second-order IIR section (direct form I coefficients, `a0 = 1`).
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// Butterworth lowpass section at normalized frequency `w` (fraction
    /// of Nyquist, in `(0, 1)`) with pole quality factor `q`, via the
    /// bilinear transform.
    fn lowpass(w: f64, q: f64) -> Self {
        let k = (PI * w / 2.0).tan();
        let k2 = k * k;
        let norm = 1.0 / (1.0 + k / q + k2);
        Self {
            b0: k2 * norm,
            b1: 2.0 * k2 * norm,
            b2: k2 * norm,
            a1: 2.0 * (k2 - 1.0) * norm,
            a2: (1.0 - k / q + k2) * norm,
        }
    }

    /// Butterworth highpass section at normalized frequency `w`.
    fn highpass(w: f64, q: f64) -> Self {
        let k = (PI * w / 2.0).tan();
        let k2 = k * k;
        let norm = 1.0 / (1.0 + k / q + k2);
        Self {
            b0: norm,
            b1: -2.0 * norm,
            b2: norm,
            a1: 2.0 * (k2 - 1.0) * norm,
            a2: (1.0 - k / q + k2) * norm,
        }
    }

    /// Run the section over `signal`.
    ///
    /// State is initialized to the step-response steady state of the
    /// first sample, so a constant prefix produces no startup transient.
    fn process(&self, signal: &[f64]) -> Vec<f64> {
        if signal.is_empty() {
            return Vec::new();
        }
        let dc_gain = (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2);
        let mut out = vec![0.0; signal.len()];
        let (mut x1, mut x2) = (signal[0], signal[0]);
        let (mut y1, mut y2) = (signal[0] * dc_gain, signal[0] * dc_gain);
        for (i, &x0) in signal.iter().enumerate() {
            let y0 = self.b0 * x0 + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
            out[i] = y0;
            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;
        }
        out
    }
}

/// Subtract the arithmetic mean from every sample.
#[must_use]
pub fn remove_dc(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mean: f64 = signal.iter().sum::<f64>() / signal.len() as f64;
    signal.iter().map(|&s| s - mean).collect()
}

/// Apply the bandpass (or highpass fallback) filter to `samples`.
///
/// Steps:
/// 1. Reject inputs shorter than [`MIN_FILTER_INPUT`] samples.
/// 2. Optionally subtract the DC component.
/// 3. Design the Butterworth cascade for `spec` at `sample_rate_hz`.
/// 4. Apply it forward-backward (zero phase) with odd-reflection edge
///    padding.
///
/// Cutoffs are normalized by Nyquist and clamped into `[0.01, 0.99]`.
/// When the clamped low cutoff is not strictly below the high cutoff,
/// the stage falls back to a highpass at the high cutoff; if that is
/// also unrealizable the error is fatal to the invocation.
pub fn apply_filter(
    samples: &[f64],
    sample_rate_hz: f64,
    spec: &FilterSpec,
    remove_dc_first: bool,
) -> Result<Vec<f64>, SignalError> {
    if samples.len() < MIN_FILTER_INPUT {
        return Err(SignalError::SignalTooShort {
            required: MIN_FILTER_INPUT,
            actual: samples.len(),
        });
    }

    let cascade = design_cascade(spec, sample_rate_hz)?;

    let base = if remove_dc_first {
        remove_dc(samples)
    } else {
        samples.to_vec()
    };

    Ok(filtfilt(&cascade, &base))
}

/// Design the biquad cascade for `spec`.
fn design_cascade(spec: &FilterSpec, sample_rate_hz: f64) -> Result<Vec<Biquad>, SignalError> {
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(SignalError::InvalidSampleRate {
            rate_hz: sample_rate_hz,
        });
    }
    if spec.order != 4 {
        return Err(SignalError::FilterDesign {
            message: format!("unsupported filter order {}, only 4 is available", spec.order),
        });
    }

    let nyquist = sample_rate_hz / 2.0;
    let low = (spec.low_cut_hz / nyquist).clamp(NORM_FREQ_MIN, NORM_FREQ_MAX);
    let high = (spec.high_cut_hz / nyquist).clamp(NORM_FREQ_MIN, NORM_FREQ_MAX);

    if low < high {
        // 4th-order bandpass: highpass pair at the low cutoff, lowpass
        // pair at the high cutoff.
        return Ok(vec![
            Biquad::highpass(low, BUTTERWORTH_Q4[0]),
            Biquad::highpass(low, BUTTERWORTH_Q4[1]),
            Biquad::lowpass(high, BUTTERWORTH_Q4[0]),
            Biquad::lowpass(high, BUTTERWORTH_Q4[1]),
        ]);
    }

    // Degenerate band: fall back to a highpass-only design at the high
    // cutoff, without the lower clamp.
    let fallback = (spec.high_cut_hz / nyquist).min(NORM_FREQ_MAX);
    if !fallback.is_finite() || fallback <= 0.0 {
        return Err(SignalError::FilterDesign {
            message: format!(
                "cutoffs {}-{} Hz unrealizable at {} Hz even as highpass",
                spec.low_cut_hz, spec.high_cut_hz, sample_rate_hz
            ),
        });
    }

    warn!(
        "bandpass {}-{} Hz degenerate at {} Hz, falling back to highpass",
        spec.low_cut_hz, spec.high_cut_hz, sample_rate_hz
    );
    Ok(vec![
        Biquad::highpass(fallback, BUTTERWORTH_Q4[0]),
        Biquad::highpass(fallback, BUTTERWORTH_Q4[1]),
    ])
}

/// Forward-backward application of the cascade.
///
/// The signal is extended at both ends with odd reflections before
/// filtering to suppress startup transients, then trimmed back to its
/// original length.
fn filtfilt(cascade: &[Biquad], signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let pad = (3 * (2 * cascade.len() + 1)).min(n.saturating_sub(1));

    let first = signal[0];
    let last = signal[n - 1];
    let mut extended = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        extended.push(2.0 * first - signal[i]);
    }
    extended.extend_from_slice(signal);
    for i in 1..=pad {
        extended.push(2.0 * last - signal[n - 1 - i]);
    }

    let mut filtered = extended;
    for section in cascade {
        filtered = section.process(&filtered);
    }
    filtered.reverse();
    for section in cascade {
        filtered = section.process(&filtered);
    }
    filtered.reverse();

    filtered[pad..pad + n].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, rate: f64, secs: f64) -> Vec<f64> {
        let n = (rate * secs) as usize;
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / rate).sin())
            .collect()
    }

    fn rms(signal: &[f64]) -> f64 {
        (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
    }

    #[test]
    fn rejects_short_signal() {
        let result = apply_filter(&[1.0; 5], 30.0, &FilterSpec::default(), true);
        assert!(matches!(
            result,
            Err(SignalError::SignalTooShort {
                required: 10,
                actual: 5
            })
        ));
    }

    #[test]
    fn rejects_invalid_rate() {
        let result = apply_filter(&[1.0; 100], 0.0, &FilterSpec::default(), true);
        assert!(matches!(result, Err(SignalError::InvalidSampleRate { .. })));
    }

    #[test]
    fn rejects_unsupported_order() {
        let spec = FilterSpec {
            order: 2,
            ..Default::default()
        };
        let result = apply_filter(&sine(1.0, 50.0, 10.0), 50.0, &spec, true);
        assert!(matches!(result, Err(SignalError::FilterDesign { .. })));
    }

    #[test]
    fn dc_signal_filters_to_near_zero() {
        let signal = vec![3.7; 500];
        let filtered = apply_filter(&signal, 50.0, &FilterSpec::default(), true).unwrap();
        let peak = filtered.iter().fold(0.0_f64, |m, &x| m.max(x.abs()));
        assert!(peak < 1e-9, "DC signal should filter to ~0, got peak {peak}");
    }

    #[test]
    fn in_band_sine_passes() {
        let signal = sine(1.2, 50.0, 20.0);
        let filtered = apply_filter(&signal, 50.0, &FilterSpec::default(), true).unwrap();
        // Compare RMS over the interior to avoid edge effects
        let inner = &filtered[100..filtered.len() - 100];
        let ratio = rms(inner) / rms(&signal[100..signal.len() - 100]);
        assert!(
            (0.8..=1.1).contains(&ratio),
            "1.2 Hz sine should pass the 0.5-8 Hz band, RMS ratio {ratio}"
        );
    }

    #[test]
    fn out_of_band_sine_attenuated() {
        let signal = sine(0.1, 50.0, 60.0);
        let filtered = apply_filter(&signal, 50.0, &FilterSpec::default(), true).unwrap();
        let inner = &filtered[200..filtered.len() - 200];
        let ratio = rms(inner) / rms(&signal[200..signal.len() - 200]);
        assert!(
            ratio < 0.1,
            "0.1 Hz sine should be attenuated by the 0.5 Hz highpass, RMS ratio {ratio}"
        );
    }

    #[test]
    fn zero_phase_preserves_peak_positions() {
        let rate = 125.0;
        let signal = sine(1.0, rate, 10.0);
        let filtered = apply_filter(&signal, rate, &FilterSpec::default(), true).unwrap();

        // Peak of the 1 Hz sine near the middle of the buffer
        let window = 500..750;
        let raw_peak = window
            .clone()
            .max_by(|&a, &b| signal[a].partial_cmp(&signal[b]).unwrap())
            .unwrap();
        let filt_peak = window
            .max_by(|&a, &b| filtered[a].partial_cmp(&filtered[b]).unwrap())
            .unwrap();

        assert!(
            raw_peak.abs_diff(filt_peak) <= 2,
            "zero-phase filter moved peak from {raw_peak} to {filt_peak}"
        );
    }

    #[test]
    fn degenerate_band_falls_back_to_highpass() {
        // Low cutoff above the high cutoff after clamping
        let spec = FilterSpec {
            low_cut_hz: 9.0,
            high_cut_hz: 2.0,
            order: 4,
        };
        let signal = sine(3.0, 50.0, 20.0);
        let filtered = apply_filter(&signal, 50.0, &spec, true).unwrap();
        // 3 Hz is above the 2 Hz highpass cutoff, so most energy survives
        let inner = &filtered[100..filtered.len() - 100];
        assert!(rms(inner) > 0.3, "3 Hz sine should survive the 2 Hz highpass");
    }

    #[test]
    fn remove_dc_zero_mean() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let centered = remove_dc(&signal);
        let mean: f64 = centered.iter().sum::<f64>() / centered.len() as f64;
        assert!(mean.abs() < 1e-12);
        assert!((centered[0] + 1.5).abs() < 1e-12);
    }

    #[test]
    fn remove_dc_empty_is_empty() {
        assert!(remove_dc(&[]).is_empty());
    }
}
