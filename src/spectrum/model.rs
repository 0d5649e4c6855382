use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use triple_buffer::TripleBuffer;

use crate::spectrum::conditioner;
use crate::spectrum::config::{ConfigError, SpectrumConfig, MAX_BAR_COUNT};
use crate::spectrum::reducer;
use crate::spectrum::smoother::{BarSmoother, SmoothingPreset};
use crate::spectrum::source::{FrameSink, SourceId, SpectrumSource};

/// The published bar amplitudes, one entry per display bar
///
/// `None` marks a bar that has not received data yet; it only occurs before
/// the first frame arrives and right after a bar-count change. Set values
/// lie in [0.0, 1.0].
pub type AmplitudeBars = Vec<Option<f32>>;

/// Callback invoked with the new version number after each publish
type UpdateListener = Box<dyn Fn(u64) + Send + Sync>;

/// State shared between every clone of a [`SpectrumModel`]
struct ModelShared {
    /// Current configuration; each operation takes one snapshot of it
    config: Mutex<SpectrumConfig>,
    /// Producer half of the snapshot channel (ingest and resize write here)
    producer: Mutex<triple_buffer::Input<AmplitudeBars>>,
    /// Consumer half of the snapshot channel (the render thread reads here)
    consumer: Mutex<triple_buffer::Output<AmplitudeBars>>,
    /// Monotonically increasing publish counter
    version: AtomicU64,
    /// Envelope state for the optional temporal smoothing
    smoother: Mutex<BarSmoother>,
    /// Identity of the currently attached source
    attached: Mutex<Option<SourceId>>,
    /// Optional notify-on-publish observer
    listener: Mutex<Option<UpdateListener>>,
}

/// Orchestrates ingestion and exposes the latest bar snapshot
///
/// One producer context calls [`ingest`](Self::ingest) (usually through a
/// [`FrameSink`] handed to an attached source); one consumer polls
/// [`current_bars`](Self::current_bars) or watches
/// [`version`](Self::version) on its own cadence. The publish step is a
/// single atomic buffer swap, so the consumer always observes either the
/// previous complete snapshot or the new one, never a half-written
/// intermediate. Stale frames are dropped, not queued.
///
/// Cloning is cheap and every clone addresses the same shared state.
#[derive(Clone)]
pub struct SpectrumModel {
    shared: Arc<ModelShared>,
}

impl SpectrumModel {
    /// Creates a model with the given configuration
    ///
    /// Bar counts above [`MAX_BAR_COUNT`] clamp to the cap; anything else
    /// invalid is rejected. The initial snapshot is all-unset at the
    /// configured length.
    pub fn new(config: SpectrumConfig) -> Result<Self, ConfigError> {
        let mut config = config;
        config.bar_count = config.bar_count.min(MAX_BAR_COUNT);
        config.validate()?;

        let (producer, consumer) = TripleBuffer::new(&vec![None; config.bar_count]).split();

        Ok(Self {
            shared: Arc::new(ModelShared {
                config: Mutex::new(config),
                producer: Mutex::new(producer),
                consumer: Mutex::new(consumer),
                version: AtomicU64::new(0),
                smoother: Mutex::new(BarSmoother::new(config.bar_count)),
                attached: Mutex::new(None),
                listener: Mutex::new(None),
            }),
        })
    }

    /// Creates a model with the default configuration
    pub fn with_defaults() -> Self {
        // The default config is statically valid
        Self::new(SpectrumConfig::default()).expect("default config must validate")
    }

    /// Binds to an external spectrum source
    ///
    /// Idempotent: attaching a source with the identity that is already
    /// bound is a no-op, so repeated calls cannot double-subscribe. A new
    /// identity replaces the previous binding and starts the source with a
    /// fresh [`FrameSink`].
    pub fn attach(&self, source: &mut dyn SpectrumSource) {
        let id = source.source_id();
        if let Ok(mut attached) = self.shared.attached.lock() {
            if *attached == Some(id) {
                return;
            }
            *attached = Some(id);
        }
        debug!("attaching spectrum source {id}");
        source.start(FrameSink::new(self.clone()));
    }

    /// Processes one raw magnitude frame and publishes the resulting bars
    ///
    /// Runs the conditioner and the reducer against a single config snapshot
    /// taken at the start of the call, so a concurrent bar-count change can
    /// never yield an output length mismatched with the config that produced
    /// it. An empty frame is a degenerate valid case and publishes silence
    /// at the configured length.
    ///
    /// Called from the producer context; every lock below guards only
    /// constant-time or bar-count-proportional work, so the producer is
    /// never blocked for unbounded time.
    pub fn ingest(&self, raw: &[f32]) {
        let config = match self.shared.config.lock() {
            Ok(config) => *config,
            // A setter panicked mid-update; drop the frame rather than the process
            Err(_) => return,
        };

        let mut values = if raw.is_empty() {
            vec![0.0; config.bar_count]
        } else {
            let normalized = conditioner::normalize(raw, &config);
            reducer::reduce(&normalized, config.bar_count)
        };

        if let Ok(mut smoother) = self.shared.smoother.lock() {
            smoother.apply(&mut values);
        }

        self.publish(values.into_iter().map(Some).collect());
    }

    /// Latest published snapshot, by copy
    ///
    /// Never returns a partially updated frame: the channel swap is atomic
    /// and the copy is taken from the consumer-owned buffer. Falls back to
    /// an all-unset vector if the consumer half is contended, which cannot
    /// happen with the intended single reader.
    pub fn current_bars(&self) -> AmplitudeBars {
        if let Ok(mut consumer) = self.shared.consumer.try_lock() {
            consumer.read().clone()
        } else {
            vec![None; self.config().bar_count]
        }
    }

    /// Publish counter; strictly increases with every published snapshot
    ///
    /// A renderer can poll this instead of comparing whole snapshots and
    /// redraw only on change.
    pub fn version(&self) -> u64 {
        self.shared.version.load(Ordering::Acquire)
    }

    /// Registers an observer invoked with the new version after each publish
    ///
    /// The callback runs in the producer context right after the snapshot
    /// swap, so it must be fast and must not call back into this model.
    pub fn set_update_listener(&self, listener: impl Fn(u64) + Send + Sync + 'static) {
        if let Ok(mut slot) = self.shared.listener.lock() {
            *slot = Some(Box::new(listener));
        }
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> SpectrumConfig {
        self.shared
            .config
            .lock()
            .map(|config| *config)
            .unwrap_or_default()
    }

    /// Updates the bar count and immediately republishes an all-unset
    /// snapshot of the new length, discarding prior values
    ///
    /// Zero is rejected; values above [`MAX_BAR_COUNT`] clamp to the cap.
    /// Setting the count it already has changes nothing.
    pub fn set_bar_count(&self, bar_count: usize) -> Result<(), ConfigError> {
        if bar_count == 0 {
            warn!("rejected bar count update: zero bars");
            return Err(ConfigError::ZeroBarCount);
        }
        let bar_count = bar_count.min(MAX_BAR_COUNT);

        if let Ok(mut config) = self.shared.config.lock() {
            if config.bar_count == bar_count {
                return Ok(());
            }
            config.bar_count = bar_count;
        }
        if let Ok(mut smoother) = self.shared.smoother.lock() {
            smoother.resize(bar_count);
        }

        debug!("bar count set to {bar_count}");
        self.publish(vec![None; bar_count]);
        Ok(())
    }

    /// Updates the dB window; takes effect on the next ingest
    ///
    /// An empty or inverted window is rejected and the previous valid
    /// config stays in effect.
    pub fn set_amplitude_range(&self, min_db: f32, max_db: f32) -> Result<(), ConfigError> {
        if !(max_db > min_db) {
            warn!("rejected amplitude range update: min {min_db} dB, max {max_db} dB");
            return Err(ConfigError::EmptyAmplitudeWindow { min_db, max_db });
        }
        if let Ok(mut config) = self.shared.config.lock() {
            config.min_amplitude_db = min_db;
            config.max_amplitude_db = max_db;
        }
        Ok(())
    }

    /// Updates the dB reference level; takes effect on the next ingest
    pub fn set_reference_level(&self, level: f32) -> Result<(), ConfigError> {
        if !level.is_finite() || level <= 0.0 {
            warn!("rejected reference level update: {level}");
            return Err(ConfigError::InvalidReferenceLevel(level));
        }
        if let Ok(mut config) = self.shared.config.lock() {
            config.reference_level = level;
        }
        Ok(())
    }

    /// Selects the temporal smoothing applied between reduction and publish
    pub fn set_smoothing(&self, preset: SmoothingPreset) {
        if let Ok(mut smoother) = self.shared.smoother.lock() {
            smoother.set_preset(preset);
        }
    }

    /// Atomically replaces the published snapshot, bumps the version and
    /// notifies the observer
    fn publish(&self, bars: AmplitudeBars) {
        if let Ok(mut producer) = self.shared.producer.lock() {
            producer.write(bars);
        }
        let version = self.shared.version.fetch_add(1, Ordering::AcqRel) + 1;
        if let Ok(listener) = self.shared.listener.lock() {
            if let Some(listener) = listener.as_ref() {
                listener(version);
            }
        }
    }
}
