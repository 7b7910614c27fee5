//! Error types for the PPG analysis pipeline.
//!
//! This module provides the full error taxonomy using [`thiserror`] for
//! automatic `Display` and `Error` trait implementations.
//!
//! # Error Hierarchy
//!
//! - [`VitalsError`]: Top-level error type returned by the pipeline
//! - [`SignalError`]: Errors from deterministic signal preprocessing
//! - [`EmbeddingError`]: Errors from the external embedding capability
//!
//! Absence of a measurable vital sign (too few peaks, no spectral bins in
//! band) is *not* an error; estimators return `Option` for those outcomes.
//!
//! # Example
//!
//! ```rust
//! use ppg_vitals_core::error::{SignalError, VitalsError};
//!
//! fn preprocess() -> Result<(), VitalsError> {
//!     Err(SignalError::SignalTooShort { required: 10, actual: 3 }.into())
//! }
//! ```

use thiserror::Error;

/// A specialized `Result` type for pipeline operations.
pub type VitalsResult<T> = Result<T, VitalsError>;

/// Top-level error type for a PPG analysis invocation.
///
/// Every variant other than [`VitalsError::Embedding`] aborts the
/// invocation; embedding failures degrade gracefully to the traditional
/// estimators.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VitalsError {
    /// Signal preprocessing error (filtering, resampling)
    #[error("signal processing error: {0}")]
    Signal(#[from] SignalError),

    /// External embedding capability error
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Input validation error
    #[error("validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },

    /// The processed signal was shorter than one segment
    #[error(
        "segmentation produced no segments: {available} samples at {rate_hz} Hz \
         is shorter than one {segment_duration_s} s segment"
    )]
    Segmentation {
        /// Samples available after preprocessing
        available: usize,
        /// Rate of the processed signal in Hz
        rate_hz: f64,
        /// Requested segment duration in seconds
        segment_duration_s: f64,
    },

    /// A stage produced NaN or infinite samples
    #[error("non-finite value in {stage} output")]
    Numeric {
        /// The stage whose output was not finite
        stage: &'static str,
    },
}

impl VitalsError {
    /// Creates a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new numeric error for the given stage.
    #[must_use]
    pub fn numeric(stage: &'static str) -> Self {
        Self::Numeric { stage }
    }

    /// Returns `true` if the pipeline can still produce a result after
    /// this error (only embedding unavailability qualifies).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Embedding(e) => e.is_recoverable(),
            Self::Signal(_)
            | Self::Validation { .. }
            | Self::Segmentation { .. }
            | Self::Numeric { .. } => false,
        }
    }
}

/// Errors from deterministic signal preprocessing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SignalError {
    /// Input shorter than the stage's minimum
    #[error("signal too short: need at least {required} samples, got {actual}")]
    SignalTooShort {
        /// Minimum required samples
        required: usize,
        /// Available samples
        actual: usize,
    },

    /// Filter cutoffs unrealizable even after the highpass fallback
    #[error("filter design failed: {message}")]
    FilterDesign {
        /// Description of the design failure
        message: String,
    },

    /// Sample rate is zero, negative, or not finite
    #[error("invalid sample rate: {rate_hz} Hz")]
    InvalidSampleRate {
        /// The offending rate
        rate_hz: f64,
    },

    /// Resampling would produce an empty output buffer
    #[error(
        "resampling {input_len} samples from {source_rate_hz} Hz to \
         {target_rate_hz} Hz yields an empty signal"
    )]
    ResampleTooShort {
        /// Input length in samples
        input_len: usize,
        /// Source rate in Hz
        source_rate_hz: f64,
        /// Target rate in Hz
        target_rate_hz: f64,
    },

    /// Segment duration is zero, negative, or not finite
    #[error("invalid segment duration: {duration_s} s")]
    InvalidSegmentDuration {
        /// The offending duration
        duration_s: f64,
    },
}

/// Errors from the external embedding capability.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EmbeddingError {
    /// The model is not loaded; the pipeline falls back to traditional
    /// estimators instead of aborting.
    #[error("embedding model unavailable: {reason}")]
    Unavailable {
        /// Why the model cannot serve requests
        reason: String,
    },

    /// The extractor returned a vector of the wrong length
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the extractor advertises
        expected: usize,
        /// Dimension actually returned
        actual: usize,
    },

    /// Inference itself failed
    #[error("embedding inference failed: {message}")]
    InferenceFailed {
        /// Description of the failure
        message: String,
    },
}

impl EmbeddingError {
    /// Creates a new unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the pipeline should fall back rather than abort.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Unavailable { .. } => true,
            Self::DimensionMismatch { .. } | Self::InferenceFailed { .. } => false,
        }
    }
}
