//! Amplitude conditioning: normalization and flatline detection.

/// Normalization scheme applied before embedding extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMethod {
    /// Scale into [0, 1] by the signal's range.
    MinMax,
    /// Zero mean, unit variance.
    ZScore,
}

/// Range / standard deviation below this is treated as degenerate and
/// the signal is only centered, not scaled.
const SCALE_EPSILON: f64 = 1e-10;

/// Normalize `samples` with the given method.
///
/// Degenerate signals (near-constant) are centered without scaling so
/// the output never contains inf or NaN.
#[must_use]
pub fn normalize(samples: &[f64], method: NormalizationMethod) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    match method {
        NormalizationMethod::MinMax => {
            let min = samples.iter().fold(f64::INFINITY, |m, &x| m.min(x));
            let max = samples.iter().fold(f64::NEG_INFINITY, |m, &x| m.max(x));
            let range = max - min;
            if range < SCALE_EPSILON {
                samples.iter().map(|&x| x - min).collect()
            } else {
                samples.iter().map(|&x| (x - min) / range).collect()
            }
        }
        NormalizationMethod::ZScore => {
            let n = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let variance = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            if std < SCALE_EPSILON {
                samples.iter().map(|&x| x - mean).collect()
            } else {
                samples.iter().map(|&x| (x - mean) / std).collect()
            }
        }
    }
}

/// Whether the signal is effectively flat (population standard deviation
/// below `threshold`). Flat segments carry no pulse information.
#[must_use]
pub fn detect_flatline(samples: &[f64], threshold: f64) -> bool {
    if samples.is_empty() {
        return true;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() < threshold
}
