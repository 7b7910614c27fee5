//! Fixed-duration segmentation of processed waveforms.

use ppg_vitals_core::error::SignalError;

/// Split `samples` into consecutive non-overlapping segments of
/// `segment_duration_s` seconds at `rate_hz`.
///
/// The trailing remainder shorter than one segment is dropped. A signal
/// shorter than one segment yields an empty vector; the caller decides
/// whether that is fatal.
pub fn segment_waveform(
    samples: &[f64],
    segment_duration_s: f64,
    rate_hz: f64,
) -> Result<Vec<Vec<f64>>, SignalError> {
    if !segment_duration_s.is_finite() || segment_duration_s <= 0.0 {
        return Err(SignalError::InvalidSegmentDuration {
            duration_s: segment_duration_s,
        });
    }
    if !rate_hz.is_finite() || rate_hz <= 0.0 {
        return Err(SignalError::InvalidSampleRate { rate_hz });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segment_len = (segment_duration_s * rate_hz).round() as usize;
    if segment_len == 0 {
        return Err(SignalError::InvalidSegmentDuration {
            duration_s: segment_duration_s,
        });
    }

    Ok(samples
        .chunks_exact(segment_len)
        .map(<[f64]>::to_vec)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_exact_segments() {
        // 25 s at 125 Hz with 10 s segments: two full segments, 5 s dropped
        let samples: Vec<f64> = (0..3125).map(f64::from).collect();
        let segments = segment_waveform(&samples, 10.0, 125.0).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 1250);
        assert_eq!(segments[1].len(), 1250);
        // Non-overlapping and in order
        assert!((segments[0][1249] - 1249.0).abs() < f64::EPSILON);
        assert!((segments[1][0] - 1250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn short_signal_yields_no_segments() {
        let samples = vec![0.0; 1000];
        let segments = segment_waveform(&samples, 10.0, 125.0).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn rejects_invalid_duration() {
        let samples = vec![0.0; 100];
        assert!(matches!(
            segment_waveform(&samples, 0.0, 125.0),
            Err(SignalError::InvalidSegmentDuration { .. })
        ));
        assert!(matches!(
            segment_waveform(&samples, f64::NAN, 125.0),
            Err(SignalError::InvalidSegmentDuration { .. })
        ));
    }

    #[test]
    fn rejects_invalid_rate() {
        let samples = vec![0.0; 100];
        assert!(matches!(
            segment_waveform(&samples, 10.0, -1.0),
            Err(SignalError::InvalidSampleRate { .. })
        ));
    }

    #[test]
    fn tiny_duration_rounds_to_zero_length() {
        let samples = vec![0.0; 100];
        assert!(matches!(
            segment_waveform(&samples, 1e-6, 125.0),
            Err(SignalError::InvalidSegmentDuration { .. })
        ));
    }
}
