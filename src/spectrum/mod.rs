pub mod conditioner;
pub mod config;
pub mod model;
pub mod reducer;
pub mod smoother;
pub mod source;

pub use config::{ConfigError, SpectrumConfig, MAX_BAR_COUNT};
pub use model::{AmplitudeBars, SpectrumModel};
pub use smoother::SmoothingPreset;
pub use source::{FrameSink, SourceId, SpectrumSource};
