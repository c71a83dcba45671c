//! Automatic text-orientation detection for OCR pipelines.
//!
//! Given a captured image that may be rotated at an arbitrary angle, find the
//! rotation that best aligns embedded text for recognition. The search is a
//! three-stage coarse-to-fine sweep over candidate angles, each candidate
//! rendered with canvas expansion, repaired with a dominant-grayscale
//! background fill, and scored by an external recognition engine.
//!
//! ```no_run
//! # #[cfg(feature = "engine-tesseract")]
//! use textorient::{DetectorConfig, OrientationDetector, TesseractRecognizer};
//!
//! # #[cfg(feature = "engine-tesseract")]
//! # fn main() -> Result<(), textorient::OrientError> {
//! let recognizer = TesseractRecognizer::new("eng", None)?;
//! let detector = OrientationDetector::new(recognizer, DetectorConfig::default());
//! let angle = detector.detect_best_orientation("capture.png".as_ref())?;
//! println!("best orientation: {angle}");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "engine-tesseract"))]
//! # fn main() {}
//! ```

pub mod config;
pub mod detect;
pub mod engine;
pub mod engines;
pub mod error;
pub mod inpaint;
pub mod preprocess;
pub mod rotate;
pub mod score;

pub use config::{DetectorConfig, PreprocessOptions, SearchOptions};
pub use detect::{DetectionReport, OrientationDetector};
pub use engine::{EngineProvider, Recognition, RecognitionEngine, SegmentationMode};
pub use error::OrientError;
pub use rotate::rotate_image;

#[cfg(feature = "engine-tesseract")]
pub use engines::tesseract::TesseractRecognizer;
