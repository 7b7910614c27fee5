//! Signal buffers and the terminal estimate record.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{VitalsError, VitalsResult};

/// A raw PPG waveform as supplied by the caller.
///
/// Immutable once constructed; the pipeline never mutates the sample
/// buffer in place.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawSignal {
    /// Ordered waveform samples.
    pub samples: Vec<f64>,
    /// Acquisition rate in Hz (camera frame rate or sensor rate).
    pub source_rate_hz: f64,
}

impl RawSignal {
    /// Create a raw signal, validating that the buffer is non-empty and
    /// the rate is a finite positive frequency.
    pub fn new(samples: Vec<f64>, source_rate_hz: f64) -> VitalsResult<Self> {
        if samples.is_empty() {
            return Err(VitalsError::validation("signal is empty"));
        }
        if !source_rate_hz.is_finite() || source_rate_hz <= 0.0 {
            return Err(VitalsError::validation(format!(
                "source rate must be a positive frequency, got {source_rate_hz} Hz"
            )));
        }
        Ok(Self {
            samples,
            source_rate_hz,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer is empty (never true for a validated signal).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal duration in seconds.
    #[must_use]
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.source_rate_hz
    }
}

/// A filtered, resampled waveform produced by the preprocessing stages.
///
/// Owned by the pipeline invocation that produced it; never shared
/// across requests.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessedSignal {
    /// Ordered waveform samples at `rate_hz`.
    pub samples: Vec<f64>,
    /// Effective sample rate in Hz. Equals the requested target rate
    /// unless resampling was skipped as a no-op.
    pub rate_hz: f64,
}

impl ProcessedSignal {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal duration in seconds.
    #[must_use]
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.rate_hz
    }
}

/// Terminal output record of one analysis invocation.
///
/// Constructed once per invocation and returned to the caller. Vital
/// signs that could not be measured are `None`; this is a valid outcome,
/// distinct from the error taxonomy.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VitalEstimate {
    /// Heart rate in beats per minute, clamped to [40, 200].
    pub heart_rate_bpm: Option<f64>,
    /// Heart-rate variability as the standard deviation of inter-beat
    /// intervals, in milliseconds.
    pub hrv_ms: Option<f64>,
    /// Respiratory rate in breaths per minute.
    pub respiratory_rate_bpm: Option<f64>,
    /// Signal quality score in [0, 1].
    pub quality: f64,
    /// Confidence in the estimates, `min(quality * 1.2, 1.0)`.
    pub confidence: f64,
    /// Human-readable degradation notes (missing embedding model, low
    /// signal quality).
    pub warnings: Vec<String>,
}

impl VitalEstimate {
    /// Whether at least one vital sign was measured.
    #[must_use]
    pub fn has_vitals(&self) -> bool {
        self.heart_rate_bpm.is_some()
            || self.hrv_ms.is_some()
            || self.respiratory_rate_bpm.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_signal_rejects_empty() {
        assert!(RawSignal::new(vec![], 50.0).is_err());
    }

    #[test]
    fn raw_signal_rejects_bad_rate() {
        assert!(RawSignal::new(vec![1.0, 2.0], 0.0).is_err());
        assert!(RawSignal::new(vec![1.0, 2.0], -30.0).is_err());
        assert!(RawSignal::new(vec![1.0, 2.0], f64::NAN).is_err());
    }

    #[test]
    fn raw_signal_duration() {
        let signal = RawSignal::new(vec![0.0; 150], 30.0).unwrap();
        assert!((signal.duration_s() - 5.0).abs() < 1e-12);
        assert_eq!(signal.len(), 150);
    }

    #[test]
    fn processed_signal_duration() {
        let signal = ProcessedSignal {
            samples: vec![0.0; 1250],
            rate_hz: 125.0,
        };
        assert!((signal.duration_s() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn estimate_has_vitals() {
        let empty = VitalEstimate {
            heart_rate_bpm: None,
            hrv_ms: None,
            respiratory_rate_bpm: None,
            quality: 0.0,
            confidence: 0.0,
            warnings: vec![],
        };
        assert!(!empty.has_vitals());

        let with_hr = VitalEstimate {
            heart_rate_bpm: Some(72.0),
            ..empty
        };
        assert!(with_hr.has_vitals());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn estimate_serde_roundtrip_uses_camel_case() {
        let estimate = VitalEstimate {
            heart_rate_bpm: Some(72.0),
            hrv_ms: Some(45.0),
            respiratory_rate_bpm: Some(15.0),
            quality: 0.92,
            confidence: 1.0,
            warnings: vec![],
        };
        let json = serde_json::to_string(&estimate).unwrap();
        assert!(json.contains("heartRateBpm"));
        let parsed: VitalEstimate = serde_json::from_str(&json).unwrap();
        assert!((parsed.heart_rate_bpm.unwrap() - 72.0).abs() < f64::EPSILON);
    }
}
