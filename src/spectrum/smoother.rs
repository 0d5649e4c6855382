/// Temporal smoothing presets for the published bars
///
/// Asymmetric attack/release envelopes in the style of analog analyzers:
/// rising bars respond quickly so transients stay visible, falling bars decay
/// slowly so the display is easy to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingPreset {
    /// No envelope: every frame is published exactly as reduced
    #[default]
    Off,
    /// Calm display for overall monitoring
    Slow,
    /// Balanced response
    Medium,
    /// Snappy response for transient-heavy material
    Fast,
}

impl SmoothingPreset {
    /// Per-frame attack and release coefficients
    ///
    /// Alpha of 1.0 would be instant response, 0.0 would never move.
    fn coefficients(self) -> Option<(f32, f32)> {
        match self {
            Self::Off => None,
            Self::Slow => Some((0.5, 0.05)),
            Self::Medium => Some((0.7, 0.15)),
            Self::Fast => Some((0.9, 0.4)),
        }
    }
}

/// Per-bar attack/release envelope applied between reduction and publish
pub struct BarSmoother {
    preset: SmoothingPreset,
    /// Envelope state, one slot per bar
    envelope: Vec<f32>,
}

impl BarSmoother {
    pub fn new(bar_count: usize) -> Self {
        Self {
            preset: SmoothingPreset::Off,
            envelope: vec![0.0; bar_count],
        }
    }

    pub fn set_preset(&mut self, preset: SmoothingPreset) {
        self.preset = preset;
    }

    /// Drops the envelope state and adopts a new bar count
    pub fn resize(&mut self, bar_count: usize) {
        self.envelope.clear();
        self.envelope.resize(bar_count, 0.0);
    }

    /// Applies the envelope in place
    ///
    /// Exponential smoothing per bar: y[n] = y[n-1] + alpha * (x[n] - y[n-1]),
    /// with alpha picked per bar depending on whether the new value rises
    /// above or falls below the envelope.
    pub fn apply(&mut self, bars: &mut [f32]) {
        let (attack, release) = match self.preset.coefficients() {
            Some(coefficients) => coefficients,
            None => return,
        };

        if self.envelope.len() != bars.len() {
            self.resize(bars.len());
        }

        for (bar, state) in bars.iter_mut().zip(self.envelope.iter_mut()) {
            let alpha = if *bar > *state { attack } else { release };
            *state += (*bar - *state) * alpha;
            *bar = *state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn off_preset_leaves_bars_untouched() {
        let mut smoother = BarSmoother::new(3);
        let mut bars = [0.2, 0.9, 0.5];
        smoother.apply(&mut bars);
        assert_eq!(bars, [0.2, 0.9, 0.5]);
    }

    #[test]
    fn attack_rises_faster_than_release_decays() {
        let mut smoother = BarSmoother::new(1);
        smoother.set_preset(SmoothingPreset::Medium);

        let mut rising = [1.0];
        smoother.apply(&mut rising);
        let after_attack = rising[0];
        assert_relative_eq!(after_attack, 0.7);

        let mut falling = [0.0];
        smoother.apply(&mut falling);
        // One release step from 0.7 toward 0.0 sheds only 15%
        assert_relative_eq!(falling[0], after_attack * 0.85);
    }

    #[test]
    fn envelope_converges_to_a_held_target() {
        let mut smoother = BarSmoother::new(1);
        smoother.set_preset(SmoothingPreset::Fast);

        let mut last = 0.0;
        for _ in 0..32 {
            let mut bars = [1.0];
            smoother.apply(&mut bars);
            assert!(bars[0] >= last);
            last = bars[0];
        }
        assert_relative_eq!(last, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn resize_resets_the_envelope() {
        let mut smoother = BarSmoother::new(2);
        smoother.set_preset(SmoothingPreset::Slow);

        let mut bars = [1.0, 1.0];
        smoother.apply(&mut bars);
        smoother.resize(4);

        let mut fresh = [1.0, 1.0, 1.0, 1.0];
        smoother.apply(&mut fresh);
        // All four bars start from a zeroed envelope again
        for value in fresh {
            assert_relative_eq!(value, 0.5);
        }
    }
}
