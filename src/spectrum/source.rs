use crate::spectrum::model::SpectrumModel;

/// Stable identity of a spectrum source instance
///
/// [`SpectrumModel::attach`] uses it to keep re-attachment idempotent.
pub type SourceId = u64;

/// Capability implemented by anything that can deliver raw magnitude frames
///
/// Decouples the conditioning/reduction core from any particular audio
/// backend: an FFT tap registers itself here instead of the model knowing
/// about audio nodes or callback queues. Frame rate and bin count are
/// entirely the source's business; the pipeline handles whatever arrives.
pub trait SpectrumSource {
    /// Identity used for attach idempotence
    fn source_id(&self) -> SourceId;

    /// Begins delivery; the source calls [`FrameSink::deliver`] once per
    /// frame from whatever context drives it
    fn start(&mut self, sink: FrameSink);
}

/// Cloneable delivery handle handed to an attached source
#[derive(Clone)]
pub struct FrameSink {
    model: SpectrumModel,
}

impl FrameSink {
    pub(crate) fn new(model: SpectrumModel) -> Self {
        Self { model }
    }

    /// Forwards one raw magnitude frame into the pipeline
    pub fn deliver(&self, frame: &[f32]) {
        self.model.ingest(frame);
    }
}
