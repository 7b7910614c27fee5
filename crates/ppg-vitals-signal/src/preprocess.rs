//! Combined preprocessing stage: filter, then resample.

use ppg_vitals_core::error::SignalError;
use ppg_vitals_core::types::ProcessedSignal;
use tracing::debug;

use crate::filter::{apply_filter, FilterSpec};
use crate::resample::resample;

/// Configuration for the preprocessing stage.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Bandpass cutoffs and order.
    pub filter: FilterSpec,
    /// Rate the waveform is resampled to after filtering, in Hz.
    pub target_rate_hz: f64,
    /// Whether to subtract the DC component before filtering.
    pub remove_dc: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            filter: FilterSpec::default(),
            target_rate_hz: 125.0,
            remove_dc: true,
        }
    }
}

/// Run the full preprocessing chain on a raw waveform.
///
/// Filters at the source rate, then resamples to the configured target.
/// The returned signal's `rate_hz` is the *effective* rate, which equals
/// the source rate when resampling was skipped as a no-op.
pub fn preprocess_signal(
    samples: &[f64],
    source_rate_hz: f64,
    config: &PreprocessConfig,
) -> Result<ProcessedSignal, SignalError> {
    let filtered = apply_filter(samples, source_rate_hz, &config.filter, config.remove_dc)?;
    let (resampled, rate_hz) = resample(&filtered, source_rate_hz, config.target_rate_hz)?;

    debug!(
        input_len = samples.len(),
        output_len = resampled.len(),
        source_rate_hz,
        rate_hz,
        "preprocessing complete"
    );

    Ok(ProcessedSignal {
        samples: resampled,
        rate_hz,
    })
}
