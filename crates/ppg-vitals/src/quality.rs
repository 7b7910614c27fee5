//! Signal quality and confidence scoring.
//!
//! Quality is scored from the embedding when one is available (its
//! variance tracks how much pulse structure the model found), otherwise
//! from the spectral SNR. Both map into [0, 1].

/// Embedding variance that maps to full quality.
pub const VARIANCE_NORMALIZER: f64 = 10.0;

/// SNR mapped to quality 0.0.
pub const SNR_QUALITY_FLOOR_DB: f64 = 0.0;

/// SNR mapped to quality 1.0.
pub const SNR_QUALITY_CEILING_DB: f64 = 20.0;

/// Quality score from an embedding vector: population variance scaled
/// by [`VARIANCE_NORMALIZER`] and capped at 1.0. An empty embedding
/// scores 0.0.
#[must_use]
pub fn quality_from_embedding(embedding: &[f64]) -> f64 {
    if embedding.is_empty() {
        return 0.0;
    }
    let n = embedding.len() as f64;
    let mean = embedding.iter().sum::<f64>() / n;
    let variance = embedding.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (variance / VARIANCE_NORMALIZER).min(1.0)
}

/// Quality score from spectral SNR: linear between the floor and
/// ceiling, clamped to [0, 1].
#[must_use]
pub fn quality_from_snr(snr_db: f64) -> f64 {
    ((snr_db - SNR_QUALITY_FLOOR_DB) / (SNR_QUALITY_CEILING_DB - SNR_QUALITY_FLOOR_DB))
        .clamp(0.0, 1.0)
}

/// Confidence derived from quality: `min(quality * 1.2, 1.0)`.
#[must_use]
pub fn confidence_from_quality(quality: f64) -> f64 {
    (quality * 1.2).min(1.0)
}
