//! Real-time spectral bar pipeline.
//!
//! Takes raw FFT magnitude frames from an external tap, conditions them
//! (NaN/Inf sanitation, decibel conversion, normalization, clipping),
//! reduces them to a fixed number of max-hold bars, and publishes the
//! result as an atomic snapshot for a renderer running on its own thread.

pub mod spectrum;

pub use spectrum::{
    AmplitudeBars, ConfigError, FrameSink, SmoothingPreset, SourceId, SpectrumConfig,
    SpectrumModel, SpectrumSource, MAX_BAR_COUNT,
};
