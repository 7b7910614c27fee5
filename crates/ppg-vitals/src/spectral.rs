//! Welch power spectral density, respiratory rate, and spectral SNR.
//!
//! Respiration modulates the PPG baseline at 0.15-0.4 Hz (9-24 breaths
//! per minute), well below the cardiac band, so it is read directly off
//! the PSD rather than from peak timing.

use num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::debug;

/// Respiratory band in Hz, inclusive on both ends.
pub const RESP_BAND_HZ: (f64, f64) = (0.15, 0.4);

/// Cardiac signal band for SNR, in Hz.
pub const SNR_SIGNAL_BAND_HZ: (f64, f64) = (0.5, 4.0);

/// Noise band for SNR, in Hz.
pub const SNR_NOISE_BAND_HZ: (f64, f64) = (4.0, 8.0);

/// Segment length cap for Welch averaging, in seconds of signal.
const WELCH_SEGMENT_S: f64 = 4.0;

/// One-sided power spectral density estimate.
#[derive(Debug, Clone)]
pub struct SpectralEstimate {
    /// Bin center frequencies in Hz, ascending from DC.
    pub frequencies: Vec<f64>,
    /// Power density per bin, in signal-units squared per Hz.
    pub power: Vec<f64>,
}

impl SpectralEstimate {
    /// Mean power over the inclusive frequency band, or `None` when no
    /// bin falls inside it.
    #[must_use]
    pub fn band_power(&self, low_hz: f64, high_hz: f64) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (f, p) in self.frequencies.iter().zip(self.power.iter()) {
            if *f >= low_hz && *f <= high_hz {
                sum += p;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }
}

/// Hann window of length `n`.
fn hann_window(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64).cos()))
        .collect()
}

/// Welch PSD with Hann-windowed, mean-detrended, 50 %-overlapping
/// segments.
///
/// The segment length is four seconds of signal, capped at the full
/// buffer. Returns `None` for signals too short to window (< 2 samples).
#[must_use]
pub fn welch_psd(samples: &[f64], rate_hz: f64) -> Option<SpectralEstimate> {
    if samples.len() < 2 || !rate_hz.is_finite() || rate_hz <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nperseg = samples.len().min((rate_hz * WELCH_SEGMENT_S) as usize);
    if nperseg < 2 {
        return None;
    }
    let step = nperseg - nperseg / 2;

    let window = hann_window(nperseg);
    let win_sumsq: f64 = window.iter().map(|w| w * w).sum();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(nperseg);

    let n_bins = nperseg / 2 + 1;
    let mut accumulated = vec![0.0; n_bins];
    let mut n_segments = 0usize;

    let mut start = 0;
    while start + nperseg <= samples.len() {
        let segment = &samples[start..start + nperseg];
        let mean = segment.iter().sum::<f64>() / nperseg as f64;

        let mut buffer: Vec<Complex64> = segment
            .iter()
            .zip(window.iter())
            .map(|(&s, &w)| Complex64::new((s - mean) * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        for (acc, bin) in accumulated.iter_mut().zip(buffer.iter().take(n_bins)) {
            *acc += bin.norm_sqr();
        }

        n_segments += 1;
        start += step;
    }

    if n_segments == 0 {
        return None;
    }

    // Density scaling, one-sided: interior bins carry the energy of
    // their negative-frequency twins.
    let scale = 1.0 / (rate_hz * win_sumsq * n_segments as f64);
    let mut power: Vec<f64> = accumulated.iter().map(|p| p * scale).collect();
    let last = power.len() - 1;
    let has_nyquist = nperseg % 2 == 0;
    for (k, p) in power.iter_mut().enumerate() {
        if k != 0 && !(has_nyquist && k == last) {
            *p *= 2.0;
        }
    }

    let frequencies = (0..n_bins)
        .map(|k| k as f64 * rate_hz / nperseg as f64)
        .collect();

    debug!(nperseg, n_segments, "Welch PSD computed");
    Some(SpectralEstimate { frequencies, power })
}

/// Respiratory rate in breaths per minute from the PSD.
///
/// Takes the frequency of the strongest bin in the respiratory band.
/// `None` when no bin falls inside the band or the band carries no
/// power.
#[must_use]
pub fn estimate_respiratory_rate(psd: &SpectralEstimate) -> Option<f64> {
    let (low, high) = RESP_BAND_HZ;
    let mut best: Option<(f64, f64)> = None;
    for (&f, &p) in psd.frequencies.iter().zip(psd.power.iter()) {
        if f >= low && f <= high {
            match best {
                Some((_, best_p)) if p <= best_p => {}
                _ => best = Some((f, p)),
            }
        }
    }
    let (freq, peak) = best?;
    (peak > 0.0).then(|| freq * 60.0)
}

/// Spectral SNR in dB: mean cardiac-band power over mean noise-band
/// power.
///
/// Noise-dominant signals report negative dB. Only degenerate cases
/// (either band empty or non-positive) collapse to the 0.0 dB floor.
#[must_use]
pub fn estimate_snr_db(psd: &SpectralEstimate) -> f64 {
    let signal = psd.band_power(SNR_SIGNAL_BAND_HZ.0, SNR_SIGNAL_BAND_HZ.1);
    let noise = psd.band_power(SNR_NOISE_BAND_HZ.0, SNR_NOISE_BAND_HZ.1);

    match (signal, noise) {
        (Some(s), Some(n)) if s > 0.0 && n > 0.0 => 10.0 * (s / n).log10(),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, rate: f64, secs: f64) -> Vec<f64> {
        let n = (rate * secs) as usize;
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / rate).sin())
            .collect()
    }

    fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
        a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
    }

    #[test]
    fn psd_peak_at_sine_frequency() {
        // 32 Hz rate gives 0.25 Hz resolution with 128-sample segments
        let signal = sine(1.0, 32.0, 64.0);
        let psd = welch_psd(&signal, 32.0).unwrap();
        let peak_bin = psd
            .power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!((psd.frequencies[peak_bin] - 1.0).abs() < 0.26);
    }

    #[test]
    fn psd_total_power_matches_sine_variance() {
        let signal = sine(1.0, 32.0, 64.0);
        let psd = welch_psd(&signal, 32.0).unwrap();
        let df = psd.frequencies[1] - psd.frequencies[0];
        let total: f64 = psd.power.iter().sum::<f64>() * df;
        // Unit sine has variance 0.5
        assert!(
            (total - 0.5).abs() < 0.05,
            "integrated PSD should match variance, got {total}"
        );
    }

    #[test]
    fn psd_none_for_tiny_input() {
        assert!(welch_psd(&[1.0], 32.0).is_none());
        assert!(welch_psd(&[], 32.0).is_none());
        assert!(welch_psd(&[1.0, 2.0, 3.0], 0.0).is_none());
    }

    #[test]
    fn respiratory_rate_from_baseline_oscillation() {
        // 0.25 Hz = 15 breaths per minute, lands exactly on a bin
        let signal = sine(0.25, 32.0, 64.0);
        let psd = welch_psd(&signal, 32.0).unwrap();
        let rr = estimate_respiratory_rate(&psd).unwrap();
        assert!((rr - 15.0).abs() < 1.0, "expected ~15 BrPM, got {rr}");
    }

    #[test]
    fn respiratory_rate_none_when_band_missing() {
        // At 0.5 Hz rate the PSD tops out at 0.25 Hz with 2-sample
        // segments; build a PSD with no bins in band directly.
        let psd = SpectralEstimate {
            frequencies: vec![0.0, 1.0, 2.0],
            power: vec![1.0, 1.0, 1.0],
        };
        assert!(estimate_respiratory_rate(&psd).is_none());
    }

    #[test]
    fn snr_near_zero_for_equal_band_energy() {
        let signal = add(&sine(1.0, 32.0, 64.0), &sine(6.0, 32.0, 64.0));
        let psd = welch_psd(&signal, 32.0).unwrap();
        let snr = estimate_snr_db(&psd);
        assert!(
            snr.abs() < 3.0,
            "equal-power bands should give near-zero SNR, got {snr} dB"
        );
    }

    #[test]
    fn snr_negative_for_noise_dominant_signal() {
        // Weak cardiac tone under strong out-of-band interference:
        // 1:100 power ratio should read ~-20 dB, not the degenerate floor
        let cardiac: Vec<f64> = sine(1.0, 32.0, 64.0).iter().map(|x| x * 0.1).collect();
        let signal = add(&cardiac, &sine(6.0, 32.0, 64.0));
        let psd = welch_psd(&signal, 32.0).unwrap();
        let snr = estimate_snr_db(&psd);
        assert!(
            (-25.0..=-15.0).contains(&snr),
            "1:100 power ratio should give ~-20 dB, got {snr}"
        );
    }

    #[test]
    fn snr_high_for_clean_cardiac_band() {
        let noise: Vec<f64> = sine(6.0, 32.0, 64.0).iter().map(|x| x * 0.1).collect();
        let signal = add(&sine(1.0, 32.0, 64.0), &noise);
        let psd = welch_psd(&signal, 32.0).unwrap();
        let snr = estimate_snr_db(&psd);
        assert!(
            (15.0..=25.0).contains(&snr),
            "100:1 power ratio should give ~20 dB, got {snr}"
        );
    }

    #[test]
    fn snr_zero_when_noise_band_absent() {
        // 6 Hz rate: Nyquist is 3 Hz, no bins reach the 4-8 Hz band
        let signal = sine(1.0, 6.0, 60.0);
        let psd = welch_psd(&signal, 6.0).unwrap();
        assert!((estimate_snr_db(&psd) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn band_power_inclusive_bounds() {
        let psd = SpectralEstimate {
            frequencies: vec![0.0, 0.5, 1.0, 1.5],
            power: vec![1.0, 2.0, 3.0, 4.0],
        };
        let mean = psd.band_power(0.5, 1.5).unwrap();
        assert!((mean - 3.0).abs() < 1e-12);
        assert!(psd.band_power(2.0, 3.0).is_none());
    }
}
