//! FFT-based sample-rate conversion.
//!
//! The waveform is transformed to the frequency domain, the spectrum is
//! truncated or zero-padded to the output length, and the inverse
//! transform yields the resampled signal. Equivalent to sinc
//! interpolation of the periodic extension of the input.

use num_complex::Complex64;
use ppg_vitals_core::error::SignalError;
use rustfft::FftPlanner;
use tracing::debug;

/// Rates closer than this are treated as equal and resampling is skipped.
pub const RATE_EPSILON_HZ: f64 = 0.1;

/// Resample `samples` from `source_rate_hz` to `target_rate_hz`.
///
/// Returns the resampled buffer together with its effective rate. When
/// the two rates differ by less than [`RATE_EPSILON_HZ`] the input is
/// returned unchanged at the source rate, so callers must use the
/// returned rate rather than assume the target was reached.
pub fn resample(
    samples: &[f64],
    source_rate_hz: f64,
    target_rate_hz: f64,
) -> Result<(Vec<f64>, f64), SignalError> {
    if samples.is_empty() {
        return Err(SignalError::SignalTooShort {
            required: 1,
            actual: 0,
        });
    }
    if !source_rate_hz.is_finite() || source_rate_hz <= 0.0 {
        return Err(SignalError::InvalidSampleRate {
            rate_hz: source_rate_hz,
        });
    }
    if !target_rate_hz.is_finite() || target_rate_hz <= 0.0 {
        return Err(SignalError::InvalidSampleRate {
            rate_hz: target_rate_hz,
        });
    }

    if (source_rate_hz - target_rate_hz).abs() < RATE_EPSILON_HZ {
        debug!(
            "skipping resample, {source_rate_hz} Hz within {RATE_EPSILON_HZ} Hz of target"
        );
        return Ok((samples.to_vec(), source_rate_hz));
    }

    let n = samples.len();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let m = (n as f64 * target_rate_hz / source_rate_hz).round() as usize;
    if m == 0 {
        return Err(SignalError::ResampleTooShort {
            input_len: n,
            source_rate_hz,
            target_rate_hz,
        });
    }

    let mut planner = FftPlanner::new();

    let mut spectrum: Vec<Complex64> = samples
        .iter()
        .map(|&s| Complex64::new(s, 0.0))
        .collect();
    planner.plan_fft_forward(n).process(&mut spectrum);

    // Copy the low-frequency bins into the output spectrum, preserving
    // conjugate symmetry so the inverse transform stays real.
    let mut out_spectrum = vec![Complex64::new(0.0, 0.0); m];
    let pos_bins = (n / 2 + 1).min(m / 2 + 1);
    out_spectrum[..pos_bins].copy_from_slice(&spectrum[..pos_bins]);
    let neg_bins = ((n - 1) / 2).min((m - 1) / 2);
    for k in 1..=neg_bins {
        out_spectrum[m - k] = spectrum[n - k];
    }
    // Downsampling to an even length folds the +/- Nyquist pair of the
    // input into the single output Nyquist bin, keeping it real.
    if m < n && m % 2 == 0 {
        out_spectrum[m / 2] = spectrum[m / 2] + spectrum[n - m / 2];
    }

    planner.plan_fft_inverse(m).process(&mut out_spectrum);

    // rustfft does not normalize; divide by the forward length so
    // amplitudes are preserved.
    let scale = 1.0 / n as f64;
    let resampled: Vec<f64> = out_spectrum.iter().map(|c| c.re * scale).collect();

    Ok((resampled, target_rate_hz))
}
