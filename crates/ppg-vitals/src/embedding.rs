//! Embedding extraction seam.
//!
//! The pipeline does not bundle a model; callers plug one in through
//! [`EmbeddingExtractor`]. When no extractor is registered, or the
//! registered one reports itself unavailable, the pipeline falls back
//! to the spectral quality path.

use ppg_vitals_core::error::EmbeddingError;

/// Produces a fixed-dimension embedding from one preprocessed segment.
///
/// Implementations must be thread-safe; a single extractor is shared
/// across concurrent analysis invocations.
pub trait EmbeddingExtractor: Send + Sync {
    /// Embed one segment sampled at `rate_hz`.
    ///
    /// Returning [`EmbeddingError::Unavailable`] signals the pipeline to
    /// degrade gracefully; any other error aborts the invocation.
    fn embed(&self, segment: &[f64], rate_hz: f64) -> Result<Vec<f64>, EmbeddingError>;

    /// Dimension of the vectors [`Self::embed`] produces.
    fn dimension(&self) -> usize;
}

/// Element-wise mean of per-segment embeddings.
///
/// All vectors must share one dimension; a mismatch indicates a broken
/// extractor and is reported rather than papered over.
pub fn mean_embedding(embeddings: &[Vec<f64>]) -> Result<Vec<f64>, EmbeddingError> {
    let first = match embeddings.first() {
        Some(e) => e,
        None => return Ok(Vec::new()),
    };
    let dim = first.len();

    let mut mean = vec![0.0; dim];
    for embedding in embeddings {
        if embedding.len() != dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dim,
                actual: embedding.len(),
            });
        }
        for (acc, &v) in mean.iter_mut().zip(embedding.iter()) {
            *acc += v;
        }
    }
    let n = embeddings.len() as f64;
    for v in &mut mean {
        *v /= n;
    }
    Ok(mean)
}
