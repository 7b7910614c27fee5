//! Pulse peak detection and time-domain vital estimation.
//!
//! Heart rate and HRV are derived from inter-beat intervals between
//! detected systolic peaks. A peak is a strict local maximum separated
//! from taller peaks by at least a refractory distance, which rejects
//! dicrotic notches and ripple within a single cardiac cycle.

use tracing::debug;

/// Lower physiological heart-rate bound in BPM; estimates below are
/// clamped rather than discarded.
pub const HR_MIN_BPM: f64 = 40.0;

/// Upper physiological heart-rate bound in BPM.
pub const HR_MAX_BPM: f64 = 200.0;

/// Default refractory interval between peaks, in seconds. 0.4 s
/// corresponds to a 150 BPM ceiling on detected beats.
pub const DEFAULT_MIN_PEAK_INTERVAL_S: f64 = 0.4;

/// Find indices of local maxima separated by at least `min_distance`
/// samples.
///
/// When two candidate peaks are closer than `min_distance`, the taller
/// one wins. Endpoints are never peaks.
#[must_use]
pub fn find_peaks(samples: &[f64], min_distance: usize) -> Vec<usize> {
    if samples.len() < 3 {
        return Vec::new();
    }

    let mut candidates: Vec<usize> = (1..samples.len() - 1)
        .filter(|&i| samples[i] > samples[i - 1] && samples[i] > samples[i + 1])
        .collect();

    if min_distance <= 1 {
        return candidates;
    }

    // Greedy suppression: keep the tallest candidates first, drop any
    // later candidate within min_distance of an accepted one.
    candidates.sort_by(|&a, &b| {
        samples[b]
            .partial_cmp(&samples[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = vec![true; samples.len()];
    let mut accepted = Vec::new();
    for &idx in &candidates {
        if !keep[idx] {
            continue;
        }
        accepted.push(idx);
        let lo = idx.saturating_sub(min_distance - 1);
        let hi = (idx + min_distance).min(samples.len());
        for flag in &mut keep[lo..hi] {
            *flag = false;
        }
    }

    accepted.sort_unstable();
    accepted
}

/// Inter-beat intervals in seconds between consecutive peaks.
fn beat_intervals(peaks: &[usize], rate_hz: f64) -> Vec<f64> {
    peaks
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64 / rate_hz)
        .collect()
}

/// Estimate heart rate in BPM from detected pulse peaks.
///
/// Needs at least two peaks (one interval). The result is clamped into
/// `[`[`HR_MIN_BPM`]`, `[`HR_MAX_BPM`]`]`.
#[must_use]
pub fn estimate_heart_rate(
    samples: &[f64],
    rate_hz: f64,
    min_peak_interval_s: f64,
) -> Option<f64> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let min_distance = (rate_hz * min_peak_interval_s) as usize;
    let peaks = find_peaks(samples, min_distance.max(1));
    if peaks.len() < 2 {
        debug!(peaks = peaks.len(), "too few peaks for heart rate");
        return None;
    }

    let intervals = beat_intervals(&peaks, rate_hz);
    let mean_interval = intervals.iter().sum::<f64>() / intervals.len() as f64;
    if mean_interval <= 0.0 {
        return None;
    }

    Some((60.0 / mean_interval).clamp(HR_MIN_BPM, HR_MAX_BPM))
}

/// Estimate heart-rate variability as the standard deviation of
/// inter-beat intervals, in milliseconds.
///
/// Needs at least three peaks (two intervals); with fewer the spread is
/// meaningless.
#[must_use]
pub fn estimate_hrv(samples: &[f64], rate_hz: f64, min_peak_interval_s: f64) -> Option<f64> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let min_distance = (rate_hz * min_peak_interval_s) as usize;
    let peaks = find_peaks(samples, min_distance.max(1));
    if peaks.len() < 3 {
        debug!(peaks = peaks.len(), "too few peaks for HRV");
        return None;
    }

    let intervals = beat_intervals(&peaks, rate_hz);
    let n = intervals.len() as f64;
    let mean = intervals.iter().sum::<f64>() / n;
    let variance = intervals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    Some(variance.sqrt() * 1000.0)
}
