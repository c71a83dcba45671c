use crate::error::OrientError;
use std::path::Path;

/// One recognition pass over a candidate image.
#[derive(Debug, Clone)]
pub struct Recognition {
    pub text: String,
    /// Mean per-word certainty reported by the engine, in 0.0-1.0.
    pub mean_confidence: f32,
}

/// How the engine partitions an image into text regions before recognizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentationMode {
    /// Let the engine infer the page layout.
    #[default]
    Automatic,
    /// Treat the image as a single uniform block of text.
    SingleBlock,
    /// Find as much text as possible in no particular order.
    SparseText,
}

impl SegmentationMode {
    /// Tesseract PSM value for this mode.
    pub fn psm_value(&self) -> &'static str {
        match self {
            SegmentationMode::Automatic => "3",
            SegmentationMode::SingleBlock => "6",
            SegmentationMode::SparseText => "11",
        }
    }
}

/// One recognition session, usable for many sequential calls.
pub trait RecognitionEngine {
    fn recognize(
        &mut self,
        image_path: &Path,
        mode: SegmentationMode,
    ) -> Result<Recognition, OrientError>;
}

/// Source of recognition sessions.
///
/// The session is a stateful, non-trivial-to-construct resource: it is
/// acquired once per top-level detection call, reused for every candidate
/// scored within that call, and dropped on every exit path.
pub trait EngineProvider {
    type Engine: RecognitionEngine;

    fn acquire(&self) -> Result<Self::Engine, OrientError>;
}
