//! PPG Signal Preprocessing Library
//!
//! This crate provides the deterministic preprocessing stages that both the
//! traditional vital-sign estimators and the external embedding model depend
//! on:
//!
//! - **Filtering**: DC removal and zero-phase Butterworth bandpass
//!   (highpass fallback) filtering
//! - **Resampling**: FFT-based rate conversion to the embedding model's
//!   target rate
//! - **Segmentation**: fixed-duration, non-overlapping segment extraction
//! - **Conditioning**: min-max/z-score normalization and flatline detection
//!
//! # Example
//!
//! ```rust
//! use ppg_vitals_signal::{preprocess_signal, PreprocessConfig};
//!
//! let samples: Vec<f64> = (0..300)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1.2 * i as f64 / 30.0).sin())
//!     .collect();
//!
//! let processed = preprocess_signal(&samples, 30.0, &PreprocessConfig::default()).unwrap();
//! assert!((processed.rate_hz - 125.0).abs() < f64::EPSILON);
//! ```

pub mod condition;
pub mod filter;
pub mod preprocess;
pub mod resample;
pub mod segment;

// Re-export main entry points for convenience
pub use condition::{detect_flatline, normalize, NormalizationMethod};
pub use filter::{apply_filter, remove_dc, FilterSpec};
pub use preprocess::{preprocess_signal, PreprocessConfig};
pub use resample::resample;
pub use segment::segment_waveform;

pub use ppg_vitals_core::error::SignalError;

/// Common result type for preprocessing operations
pub type Result<T> = std::result::Result<T, SignalError>;
