//! Three-stage coarse-to-fine angle search.
//!
//! The common case is already-upright text, so the cardinal stage runs first
//! and wins outright when its best score clears the early-exit threshold.
//! Only when the coarse tilt stage lands far from the cardinal best is the
//! expensive fine window scored.

use crate::config::DetectorConfig;
use crate::engine::{EngineProvider, RecognitionEngine, SegmentationMode};
use crate::error::OrientError;
use crate::rotate::normalize_angle;
use crate::score::{CandidateScorer, SearchState};
use image::RgbaImage;
use serde::Serialize;
use std::path::Path;

const CARDINAL_ANGLES: [f32; 4] = [0.0, 90.0, 180.0, 270.0];
const COARSE_TILT_ANGLES: [f32; 6] = [30.0, 45.0, 60.0, 120.0, 135.0, 150.0];

/// Outcome of one detection run.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    /// Best rotation, in [0, 360).
    pub angle: f32,
    /// Score of the best candidate over the whole run.
    pub best_score: f32,
    /// Text recognized at the best candidate.
    pub best_text: String,
    /// Total recognition passes spent.
    pub candidates_scored: usize,
    /// Whether the cardinal stage won outright.
    pub early_exit: bool,
}

/// Angle search orchestrator.
///
/// One recognition session is acquired per detection call, reused for every
/// candidate within the call, and dropped on every exit path.
pub struct OrientationDetector<P: EngineProvider> {
    provider: P,
    config: DetectorConfig,
}

impl<P: EngineProvider> OrientationDetector<P> {
    pub fn new(provider: P, config: DetectorConfig) -> Self {
        Self { provider, config }
    }

    /// Detect the rotation that best aligns embedded text for recognition.
    pub fn detect_best_orientation(&self, image_path: &Path) -> Result<f32, OrientError> {
        self.detect_report(image_path).map(|report| report.angle)
    }

    /// As [`detect_best_orientation`](Self::detect_best_orientation), with
    /// the full run outcome.
    pub fn detect_report(&self, image_path: &Path) -> Result<DetectionReport, OrientError> {
        if !image_path.exists() {
            return Err(OrientError::NotFound(image_path.to_path_buf()));
        }

        let source = image::open(image_path)
            .map_err(|e| OrientError::IoFailure(format!("Failed to load image: {}", e)))?
            .to_rgba8();

        let work_dir = self
            .config
            .work_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);

        let opts = &self.config.search;
        let mut engine = self.provider.acquire()?;
        let mut scorer =
            CandidateScorer::new(&mut engine, &work_dir, SegmentationMode::Automatic);
        let mut scored = 0usize;

        // Stage 1: cardinal orientations.
        let state = SearchState::default();
        let (cardinal_best, state) =
            score_stage(&mut scorer, &source, &CARDINAL_ANGLES, state, &mut scored)?;

        if state.best_score >= opts.early_exit_threshold {
            let angle = normalize_angle(cardinal_best);
            tracing::info!(angle, score = state.best_score, scored, "cardinal early exit");
            return Ok(DetectionReport {
                angle,
                best_score: state.best_score,
                best_text: state.best_text,
                candidates_scored: scored,
                early_exit: true,
            });
        }

        // Stage 2: coarse tilt sweep.
        let (tilt_best, state) =
            score_stage(&mut scorer, &source, &COARSE_TILT_ANGLES, state, &mut scored)?;

        // Stage 3: fine refinement, only when the tilt candidate drifted far
        // enough from the cardinal best to look like a genuine tilt rather
        // than scoring noise.
        let drifted = tilt_best != cardinal_best
            && (tilt_best - cardinal_best).abs() > opts.drift_threshold;

        let (final_angle, state) = if drifted {
            let window = fine_window(tilt_best.round() as i32, opts.fine_half_width);
            tracing::debug!(
                center = tilt_best,
                candidates = window.len(),
                "fine refinement window"
            );
            score_stage(&mut scorer, &source, &window, state, &mut scored)?
        } else {
            (cardinal_best, state)
        };

        let angle = normalize_angle(stabilize(final_angle, opts.stabilize_step));
        tracing::info!(angle, score = state.best_score, scored, "orientation detected");

        Ok(DetectionReport {
            angle,
            best_score: state.best_score,
            best_text: state.best_text,
            candidates_scored: scored,
            early_exit: false,
        })
    }
}

/// Score one stage's candidate list in order, folding each sample into the
/// accumulator. The stage best starts at the stage's first candidate and
/// advances only when the global best score strictly improves, so ties keep
/// the earlier-found angle.
fn score_stage<E: RecognitionEngine>(
    scorer: &mut CandidateScorer<'_, E>,
    source: &RgbaImage,
    angles: &[f32],
    mut state: SearchState,
    scored: &mut usize,
) -> Result<(f32, SearchState), OrientError> {
    let mut stage_best = angles[0];

    for &angle in angles {
        let sample = scorer.score(source, angle)?;
        *scored += 1;
        if state.observe(&sample) {
            stage_best = angle;
        }
    }

    Ok((stage_best, state))
}

/// Symmetric integer-degree window centered on a tilt candidate, clipped to
/// [0, 360).
fn fine_window(center: i32, half_width: u32) -> Vec<f32> {
    let half_width = half_width as i32;
    (center - half_width..=center + half_width)
        .filter(|a| (0..360).contains(a))
        .map(|a| a as f32)
        .collect()
}

/// Round to the nearest multiple of `step` degrees, when configured.
fn stabilize(angle: f32, step: Option<u32>) -> f32 {
    match step {
        Some(step) => {
            let step = step as f32;
            (angle / step).round() * step
        }
        None => angle,
    }
}
