//! PPG Vital-Sign Estimation
//!
//! Extracts heart rate, heart-rate variability, and respiratory rate
//! from photoplethysmography waveforms, with quality and confidence
//! scoring. Preprocessing lives in `ppg-vitals-signal`; this crate adds
//! the estimators and the pipeline that chains everything together.
//!
//! # Example
//!
//! ```rust
//! use ppg_vitals::{AnalyzeOptions, PpgAnalyzer};
//! use ppg_vitals_core::types::RawSignal;
//!
//! // 20 s of a 1.2 Hz pulse captured at 30 fps
//! let samples: Vec<f64> = (0..600)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1.2 * i as f64 / 30.0).sin())
//!     .collect();
//! let signal = RawSignal::new(samples, 30.0).unwrap();
//!
//! let analyzer = PpgAnalyzer::new(AnalyzeOptions::default());
//! let estimate = analyzer.analyze(&signal).unwrap();
//! assert!(estimate.heart_rate_bpm.is_some());
//! ```

pub mod embedding;
pub mod peaks;
pub mod pipeline;
pub mod quality;
pub mod spectral;

pub use embedding::{mean_embedding, EmbeddingExtractor};
pub use peaks::{estimate_heart_rate, estimate_hrv, find_peaks};
pub use pipeline::{AnalyzeOptions, PpgAnalyzer};
pub use quality::{confidence_from_quality, quality_from_embedding, quality_from_snr};
pub use spectral::{
    estimate_respiratory_rate, estimate_snr_db, welch_psd, SpectralEstimate,
};

pub use ppg_vitals_core::error::{EmbeddingError, VitalsError, VitalsResult};
pub use ppg_vitals_core::types::{ProcessedSignal, RawSignal, VitalEstimate};
