//! Core types for PPG vital-sign analysis.
//!
//! This crate defines the domain types shared by the preprocessing and
//! estimation crates:
//!
//! - [`RawSignal`]: a caller-supplied PPG waveform with its source rate
//! - [`ProcessedSignal`]: a filtered, resampled waveform ready for
//!   segmentation and estimation
//! - [`VitalEstimate`]: the terminal analysis record (heart rate, HRV,
//!   respiratory rate, quality, confidence)
//! - The error taxonomy ([`VitalsError`], [`SignalError`],
//!   [`EmbeddingError`])
//!
//! # Design Philosophy
//!
//! All signal buffers are immutable once constructed; every pipeline stage
//! consumes a buffer and produces a new one. Absent measurements (too few
//! pulse peaks, no spectral bins in band) are `Option::None` on
//! [`VitalEstimate`], never errors: the error taxonomy is reserved for
//! inputs and stages that genuinely fail.

pub mod error;
pub mod types;

pub use error::{EmbeddingError, SignalError, VitalsError, VitalsResult};
pub use types::{ProcessedSignal, RawSignal, VitalEstimate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
