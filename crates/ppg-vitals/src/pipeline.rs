//! Analysis pipeline orchestrator.
//!
//! Chains preprocessing, segmentation, embedding extraction, and the
//! vital-sign estimators into one invocation over a raw waveform.

use std::sync::Arc;

use ppg_vitals_core::error::{EmbeddingError, VitalsError, VitalsResult};
use ppg_vitals_core::types::{RawSignal, VitalEstimate};
use ppg_vitals_signal::filter::FilterSpec;
use ppg_vitals_signal::preprocess::{preprocess_signal, PreprocessConfig};
use ppg_vitals_signal::segment::segment_waveform;
use tracing::{info, warn};

use crate::embedding::{mean_embedding, EmbeddingExtractor};
use crate::peaks::{estimate_heart_rate, estimate_hrv};
use crate::quality::{confidence_from_quality, quality_from_embedding, quality_from_snr};
use crate::spectral::{estimate_respiratory_rate, estimate_snr_db, welch_psd};

/// Minimum raw samples accepted for analysis.
pub const MIN_ANALYZE_SAMPLES: usize = 30;

/// Quality at or below this threshold adds a degradation warning.
pub const LOW_QUALITY_THRESHOLD: f64 = 0.7;

const LOW_QUALITY_WARNING: &str = "Low signal quality detected";

/// Tunable parameters for one analyzer instance.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Embedding segment duration in seconds.
    pub segment_duration_s: f64,
    /// Rate waveforms are resampled to, in Hz.
    pub target_rate_hz: f64,
    /// Bandpass low cutoff in Hz.
    pub filter_low_hz: f64,
    /// Bandpass high cutoff in Hz.
    pub filter_high_hz: f64,
    /// Whether to subtract the DC component before filtering.
    pub remove_dc: bool,
    /// Refractory interval between detected pulse peaks, in seconds.
    pub min_peak_interval_s: f64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            segment_duration_s: 10.0,
            target_rate_hz: 125.0,
            filter_low_hz: 0.5,
            filter_high_hz: 8.0,
            remove_dc: true,
            min_peak_interval_s: crate::peaks::DEFAULT_MIN_PEAK_INTERVAL_S,
        }
    }
}

/// Stateless PPG analyzer. Cheap to clone; safe to share across threads.
#[derive(Clone)]
pub struct PpgAnalyzer {
    options: AnalyzeOptions,
    embedder: Option<Arc<dyn EmbeddingExtractor>>,
}

impl PpgAnalyzer {
    /// Create an analyzer without an embedding model; quality is scored
    /// from spectral SNR.
    #[must_use]
    pub fn new(options: AnalyzeOptions) -> Self {
        Self {
            options,
            embedder: None,
        }
    }

    /// Attach an embedding extractor.
    #[must_use]
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingExtractor>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// The analyzer's parameters.
    #[must_use]
    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    /// Run the full analysis over one raw waveform.
    ///
    /// Errors abort the invocation except embedding unavailability,
    /// which degrades to the spectral quality path and is reported in
    /// the estimate's warnings.
    pub fn analyze(&self, signal: &RawSignal) -> VitalsResult<VitalEstimate> {
        if signal.len() < MIN_ANALYZE_SAMPLES {
            return Err(VitalsError::validation(format!(
                "insufficient signal data: need at least {MIN_ANALYZE_SAMPLES} samples, \
                 got {}",
                signal.len()
            )));
        }

        let config = PreprocessConfig {
            filter: FilterSpec {
                low_cut_hz: self.options.filter_low_hz,
                high_cut_hz: self.options.filter_high_hz,
                order: 4,
            },
            target_rate_hz: self.options.target_rate_hz,
            remove_dc: self.options.remove_dc,
        };
        let processed = preprocess_signal(&signal.samples, signal.source_rate_hz, &config)?;
        ensure_finite(&processed.samples, "preprocessing")?;

        let segments = segment_waveform(
            &processed.samples,
            self.options.segment_duration_s,
            processed.rate_hz,
        )?;
        if segments.is_empty() {
            return Err(VitalsError::Segmentation {
                available: processed.len(),
                rate_hz: processed.rate_hz,
                segment_duration_s: self.options.segment_duration_s,
            });
        }

        let mut warnings = Vec::new();
        let embedding = self.extract_embedding(&segments, processed.rate_hz, &mut warnings)?;

        let heart_rate_bpm = estimate_heart_rate(
            &processed.samples,
            processed.rate_hz,
            self.options.min_peak_interval_s,
        );
        let hrv_ms = estimate_hrv(
            &processed.samples,
            processed.rate_hz,
            self.options.min_peak_interval_s,
        );

        let psd = welch_psd(&processed.samples, processed.rate_hz);
        if let Some(psd) = &psd {
            ensure_finite(&psd.power, "spectral estimation")?;
        }
        let respiratory_rate_bpm = psd.as_ref().and_then(estimate_respiratory_rate);
        let snr_db = psd.as_ref().map_or(0.0, estimate_snr_db);

        let quality = match &embedding {
            Some(e) => quality_from_embedding(e),
            None => quality_from_snr(snr_db),
        };
        let confidence = confidence_from_quality(quality);
        if quality <= LOW_QUALITY_THRESHOLD {
            warnings.push(LOW_QUALITY_WARNING.to_string());
        }

        info!(
            heart_rate_bpm,
            hrv_ms,
            respiratory_rate_bpm,
            quality,
            snr_db,
            segments = segments.len(),
            "analysis complete"
        );

        Ok(VitalEstimate {
            heart_rate_bpm,
            hrv_ms,
            respiratory_rate_bpm,
            quality,
            confidence,
            warnings,
        })
    }

    /// Embed every segment and average the results.
    ///
    /// Returns `None` (with a warning recorded) when no extractor is
    /// registered or the extractor reports itself unavailable.
    fn extract_embedding(
        &self,
        segments: &[Vec<f64>],
        rate_hz: f64,
        warnings: &mut Vec<String>,
    ) -> VitalsResult<Option<Vec<f64>>> {
        let Some(embedder) = &self.embedder else {
            warnings.push("embedding model unavailable, quality scored from spectral SNR".into());
            return Ok(None);
        };

        let mut per_segment = Vec::with_capacity(segments.len());
        for segment in segments {
            match embedder.embed(segment, rate_hz) {
                Ok(embedding) => {
                    if embedding.len() != embedder.dimension() {
                        return Err(EmbeddingError::DimensionMismatch {
                            expected: embedder.dimension(),
                            actual: embedding.len(),
                        }
                        .into());
                    }
                    per_segment.push(embedding);
                }
                Err(e @ EmbeddingError::Unavailable { .. }) => {
                    warn!("embedding extraction degraded: {e}");
                    warnings.push(format!("{e}, quality scored from spectral SNR"));
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Some(mean_embedding(&per_segment)?))
    }
}

fn ensure_finite(samples: &[f64], stage: &'static str) -> VitalsResult<()> {
    if samples.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(VitalsError::numeric(stage))
    }
}
