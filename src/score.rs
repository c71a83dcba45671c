//! Candidate scoring: one recognition pass folded into a scalar.

use crate::config::{CONFIDENCE_WEIGHT, LENGTH_WEIGHT};
use crate::engine::{RecognitionEngine, SegmentationMode};
use crate::error::OrientError;
use crate::{inpaint, rotate};
use image::RgbaImage;
use std::path::Path;

/// Scoring outcome for one candidate angle.
#[derive(Debug, Clone)]
pub struct ScoreSample {
    pub angle: f32,
    pub confidence: f32,
    /// Non-whitespace characters in the recognized text.
    pub glyph_count: usize,
    pub score: f32,
    pub text: String,
}

impl ScoreSample {
    pub fn from_recognition(angle: f32, text: &str, confidence: f32) -> Self {
        let text = text.trim_end().to_string();
        let glyph_count = text.chars().filter(|c| !c.is_whitespace()).count();
        let score = confidence * CONFIDENCE_WEIGHT + glyph_count as f32 * LENGTH_WEIGHT;
        Self {
            angle,
            confidence,
            glyph_count,
            score,
            text,
        }
    }
}

/// Running best-candidate record for one detection run.
///
/// Updated only on strict improvement: candidates that tie an earlier score
/// are ignored, so the earlier-found angle wins.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub best_angle: f32,
    pub best_score: f32,
    pub best_text: String,
}

impl SearchState {
    /// Fold one sample into the accumulator. Returns whether the sample
    /// became the new best.
    pub fn observe(&mut self, sample: &ScoreSample) -> bool {
        if sample.score > self.best_score {
            self.best_score = sample.score;
            self.best_angle = sample.angle;
            self.best_text = sample.text.clone();
            true
        } else {
            false
        }
    }
}

/// Scores candidates against a borrowed recognition session.
///
/// Per candidate: render the rotation, repair the exposed background,
/// persist the raster under a unique name, and run one recognition pass over
/// the artifact.
pub struct CandidateScorer<'a, E: RecognitionEngine> {
    engine: &'a mut E,
    work_dir: &'a Path,
    mode: SegmentationMode,
}

impl<'a, E: RecognitionEngine> CandidateScorer<'a, E> {
    pub fn new(engine: &'a mut E, work_dir: &'a Path, mode: SegmentationMode) -> Self {
        Self {
            engine,
            work_dir,
            mode,
        }
    }

    pub fn score(&mut self, source: &RgbaImage, angle: f32) -> Result<ScoreSample, OrientError> {
        let mut candidate = rotate::rotate_rgba(source, angle);
        let fill = inpaint::fill_transparent_background(&mut candidate);
        let path = rotate::persist_candidate(&candidate, self.work_dir)?;

        let recognition = self.engine.recognize(&path, self.mode)?;
        let sample = ScoreSample::from_recognition(angle, &recognition.text, recognition.mean_confidence);

        tracing::debug!(
            angle,
            fill,
            confidence = sample.confidence,
            glyphs = sample.glyph_count,
            score = sample.score,
            candidate = %path.display(),
            "scored candidate"
        );

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_weights_confidence_over_length() {
        // Confident short read: 0.9 * 2 + 2 * 0.5 = 2.8
        let confident = ScoreSample::from_recognition(0.0, "hi", 0.9);
        assert!((confident.score - 2.8).abs() < 1e-6);

        // Garbled long read needs six glyphs to catch up with zero
        // confidence; four only reaches 2.0.
        let garbled = ScoreSample::from_recognition(90.0, "x y z w", 0.0);
        assert_eq!(garbled.glyph_count, 4);
        assert!(garbled.score < confident.score);
    }

    #[test]
    fn test_trailing_whitespace_is_stripped_before_counting() {
        let sample = ScoreSample::from_recognition(0.0, "abc \n\n", 0.5);
        assert_eq!(sample.text, "abc");
        assert_eq!(sample.glyph_count, 3);
    }

    #[test]
    fn test_interior_whitespace_does_not_count_as_glyphs() {
        let sample = ScoreSample::from_recognition(0.0, "a b\nc", 0.0);
        assert_eq!(sample.glyph_count, 3);
    }

    #[test]
    fn test_search_state_updates_on_strict_improvement_only() {
        let mut state = SearchState::default();

        let first = ScoreSample::from_recognition(0.0, "abcd", 0.5);
        assert!(state.observe(&first));
        assert_eq!(state.best_angle, 0.0);

        // Identical score at a later angle: first-wins.
        let tied = ScoreSample::from_recognition(90.0, "abcd", 0.5);
        assert!(!state.observe(&tied));
        assert_eq!(state.best_angle, 0.0);
        assert_eq!(state.best_text, "abcd");

        let better = ScoreSample::from_recognition(180.0, "abcde", 0.5);
        assert!(state.observe(&better));
        assert_eq!(state.best_angle, 180.0);
        assert_eq!(state.best_text, "abcde");
    }
}
