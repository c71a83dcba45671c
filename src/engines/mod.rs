//! Recognition engine implementations
//!
//! Implementations of the [`EngineProvider`](crate::engine::EngineProvider)
//! and [`RecognitionEngine`](crate::engine::RecognitionEngine) traits.
//! Backends are conditionally compiled based on feature flags.

#[cfg(feature = "engine-tesseract")]
pub mod tesseract;

#[cfg(feature = "engine-tesseract")]
pub use tesseract::{TesseractRecognizer, TesseractSession};
