use crate::spectrum::config::SpectrumConfig;

/// Converts a raw FFT magnitude frame into normalized amplitudes
///
/// Transforms each magnitude sample into a display-ready value in [0.0, 1.0].
/// Non-finite samples are treated as silence, magnitudes are converted to a
/// decibel scale relative to the configured reference level, mapped onto the
/// configured dB window, and clipped so out-of-window values saturate instead
/// of wrapping.
///
/// # Parameters
/// * `raw` - Magnitude samples, one per FFT bin; may contain NaN or Inf
/// * `config` - Validated pipeline configuration (one snapshot per call)
///
/// # Returns
/// Vector of normalized amplitudes, same length as the input, every value
/// in [0.0, 1.0]
///
/// # Mathematical Background
/// 1. Sanitize: NaN/Inf -> 0.0 (silence, never an error)
/// 2. dB conversion: db = 20 * log10(m / reference_level)
/// 3. Affine map: n = (db - min_db) / (max_db - min_db)
///    sends min_db -> 0.0 and max_db -> 1.0
/// 4. Clip: n clamped to [0.0, 1.0]
///
/// A zero magnitude has no finite dB value; it saturates below any window
/// floor and maps straight to 0.0.
///
/// Pure function: no side effects, safe to call from any thread as long as
/// the config snapshot it receives is immutable for the duration of the call.
pub fn normalize(raw: &[f32], config: &SpectrumConfig) -> Vec<f32> {
    let db_range = config.db_range();
    raw.iter()
        .map(|&sample| {
            let magnitude = sanitize(sample);
            if magnitude <= 0.0 {
                // Silence saturates below any finite floor
                return 0.0;
            }
            let db = 20.0 * libm::log10f(magnitude / config.reference_level);
            ((db - config.min_amplitude_db) / db_range).clamp(0.0, 1.0)
        })
        .collect()
}

/// Replaces non-finite samples with silence so NaN/Inf never propagate past
/// this stage
#[inline]
fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() {
        sample
    } else {
        0.0
    }
}
